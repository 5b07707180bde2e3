use crate::error::Result;
use crate::koco_error;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";

/// Проверить, что устройства ввода можно читать
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access(Path::new(INPUT_DIR))?;
    check_user();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(koco_error!(permission, "Директория {} не существует", input_dir.display()));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir.display());
            Ok(())
        }
        Err(e) => Err(koco_error!(
            permission,
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir.display(),
            e
        )),
    }
}

fn check_user() {
    // Детектору достаточно чтения, root не нужен
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Для чтения клавиатуры достаточно группы 'input':");
            warn!("   sudo usermod -a -G input $USER");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KocoError;

    #[test]
    fn test_missing_input_dir_is_permission_error() {
        let result = check_input_devices_access(Path::new("/non/existent/input"));
        assert!(matches!(result, Err(KocoError::Permission(_))));
    }

    #[test]
    fn test_readable_dir_is_accepted() {
        let dir = std::env::temp_dir();
        assert!(check_input_devices_access(&dir).is_ok());
    }
}
