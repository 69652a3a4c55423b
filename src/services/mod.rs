//! Service layer for the trend tracker.
//!
//! This module contains the business logic for:
//! - Fetching the trends page (`HttpSource`)
//! - Extracting trend records (`TrendExtractor`)
//! - Rendering the summary document (`Renderer`)
//! - Delivering it by email (`SmtpNotifier`)

mod extractor;
mod notifier;
mod renderer;
mod source;

pub use extractor::TrendExtractor;
pub use notifier::{
    EmailCredentials, MailTransport, Notification, Notifier, RelayLogin, SmtpNotifier,
    SmtpTransport,
};
pub use renderer::Renderer;
pub use source::{HttpSource, TrendSource};
