pub mod assembler;
pub mod carriers;
pub mod dispatch;
pub mod notify;
pub mod orchestrator;
pub mod selector;

pub use assembler::{AssemblyError, DraftItem, OrderAssembler, OrderDraft};
pub use dispatch::{DispatchService, LifecycleError};
pub use notify::{ChannelRegistry, EmailChannel, NotificationChannel, SmsChannel, WebhookChannel};
pub use orchestrator::{CheckoutOrchestrator, DispatchReceipt, OrchestrationError};
pub use selector::{ProviderSelector, SelectionError, SelectionInput, SelectionPolicy};
