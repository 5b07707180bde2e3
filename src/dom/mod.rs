//! Среда событий, в которой работает детектор: дерево узлов, глобальный поток
//! нажатий клавиш и рассылка пользовательских событий с всплытием.
//!
//! Модуль ничего не знает о Konami Code. Вся логика распознавания живёт в
//! `detector`.

mod document;
mod node;

pub use document::{Document, EventListener, KeyDownListener};
pub use node::{ListenerId, NodeId};
