//! Request payloads and query builders
//!
//! One module per product area. Payload types validate themselves and
//! serialize to the JSON the bank expects (camelCase keys, absent optionals
//! omitted).

pub mod account;
pub mod billet;
pub mod customer;
pub mod document;
pub mod limits;
pub mod payload;
pub mod pix;
pub mod transfer;

pub use account::{EventsQuery, PaymentAccount, StatementQuery};
pub use billet::{BankAccountRef, BillPayment, BilletPayer, CancelBillet, DepositBillet};
pub use customer::{Address, BusinessCustomer, Customer, LegalRepresentative, Phone, Reason};
pub use document::DocumentAnalysis;
pub use limits::{LimitsUpdate, WebhookMessagesQuery};
pub use payload::{Attachment, FileAttachment, MultipartBody, Payload};
pub use pix::{
    AdditionalData, AddressingKey, Bank, BankAccount, Location, Payer, PixAccount, PixCashout,
    PixCashoutKey, PixCashoutManual, PixCashoutStaticQrCode, PixDynamicQrCode, PixEntries,
    PixQrCodeData, PixRefund, PixStaticQrCode,
};
pub use transfer::{FundTransfer, TransferParty};
