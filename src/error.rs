use thiserror::Error;

#[derive(Error, Debug)]
pub enum KocoError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Узел документа не найден: {0}")]
    NodeNotFound(usize),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl KocoError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(KocoError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, KocoError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! koco_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::KocoError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::KocoError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::KocoError::Internal(format!($($arg)*))
    };
}
