//! UI Components

mod attachments;
mod board_view;
mod card;
mod comment_thread;
mod confirm_button;
mod date_popup;
mod drop_zone;
mod label_popup;
mod member_popup;
mod mention_text;
mod notification_panel;
mod popup;
mod task_detail;
mod toast;

pub use attachments::{AttachmentList, AttachmentsPopup};
pub use board_view::BoardView;
pub use card::CardView;
pub use comment_thread::CommentThread;
pub use confirm_button::ConfirmButton;
pub use date_popup::DatePopup;
pub use drop_zone::DropZone;
pub use label_popup::LabelPopup;
pub use member_popup::MemberPopup;
pub use mention_text::MentionText;
pub use notification_panel::NotificationBell;
pub use popup::{PopupAnchor, PopupCoordinator, PopupKind, PopupShell};
pub use task_detail::TaskDetail;
pub use toast::ToastRegion;
