//! Детектор Konami Code.
//!
//! Детектор подписывается на глобальный поток `keydown` документа, сверяет
//! нажатия с последовательностью `↑ ↑ ↓ ↓ ← → ← → B A` (регистр не важен) и
//! после последней клавиши рассылает всплывающее отменяемое событие
//! `konamicode` от узла, получившего это нажатие.
//!
//! - [`detector`] - автомат распознавания, включение и отключение поддержки
//! - [`dom`] - среда событий: узлы, поток нажатий, всплытие
//! - [`services`] - источники нажатий (evdev, stdin) и уведомления

pub mod config;
pub mod detector;
pub mod dom;
pub mod error;
pub mod events;
pub mod services;
pub mod utils;

pub use detector::{add_support_for_the_konami_code, DetectionOptions, SupportRemover};
pub use dom::{Document, NodeId};
pub use events::{CustomEvent, KeyEvent, KONAMI_CODE_EVENT};
