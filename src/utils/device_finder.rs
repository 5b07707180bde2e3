use crate::error::{KocoError, Result};
use evdev::KeyCode;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Клавиши, без которых Konami Code не ввести
const REQUIRED_KEYS: [KeyCode; 7] = [
    KeyCode::KEY_UP,
    KeyCode::KEY_DOWN,
    KeyCode::KEY_LEFT,
    KeyCode::KEY_RIGHT,
    KeyCode::KEY_A,
    KeyCode::KEY_B,
    KeyCode::KEY_ENTER,
];

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее клавиатурное устройство
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                KocoError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        Self::auto_find_keyboard()
    }

    fn auto_find_keyboard() -> Result<PathBuf> {
        info!("Начинаем автопоиск клавиатурного устройства...");

        if let Ok(device) = Self::find_by_id() {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        KocoError::device_not_found(
            "Не удалось найти подходящее клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return KocoError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| KocoError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        let mut candidates = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();

            let Some(priority) = Self::by_id_priority(&name) else {
                continue;
            };

            if !Self::is_device_accessible(&path) {
                warn!("Устройство {:?} недоступно", path);
                continue;
            }

            if Self::is_keyboard_device(&path) {
                info!("Кандидат: {} (приоритет: {})", name, priority);
                candidates.push((path, priority));
            }
        }

        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        match candidates.into_iter().next() {
            Some((keyboard, _)) => Ok(keyboard),
            None => KocoError::device_not_found("Клавиатурное устройство не найдено в by-id"),
        }
    }

    /// Приоритет ссылки из /dev/input/by-id; `None` - точно не клавиатура
    fn by_id_priority(name: &str) -> Option<u32> {
        let lower = name.to_lowercase();

        if !lower.contains("event") || lower.contains("mouse") {
            return None;
        }

        if lower.ends_with("event-kbd") {
            Some(100)
        } else if lower.contains("keyboard") {
            Some(50)
        } else if lower.contains("kbd") {
            Some(10)
        } else {
            None
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| KocoError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut event_devices: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("event"))
            })
            .collect();

        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);

            if Self::is_device_accessible(&device_path) && Self::is_keyboard_device(&device_path) {
                return Ok(device_path);
            }
        }

        KocoError::device_not_found("Не найдено доступное клавиатурное устройство среди event устройств")
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let device_name = device.name().unwrap_or("Unknown").to_lowercase();

                if ["mouse", "touchpad", "trackpoint"].iter().any(|m| device_name.contains(m)) {
                    debug!("Исключаем устройство как мышь/тачпад: {:?} ({})", device_path, device_name);
                    return false;
                }

                let has_keys = device
                    .supported_keys()
                    .is_some_and(|keys| REQUIRED_KEYS.iter().all(|key| keys.contains(*key)));

                if has_keys {
                    info!("Устройство {:?} подходит как клавиатура ({})", device_path, device_name);
                } else {
                    debug!("Устройство {:?} не подходит как клавиатура ({})", device_path, device_name);
                }

                has_keys
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_specific_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(KocoError::DeviceNotFound(_))));
    }

    #[test]
    fn test_by_id_priority() {
        assert_eq!(
            DeviceFinder::by_id_priority("usb-Logitech_USB_Keyboard-event-kbd"),
            Some(100)
        );
        assert_eq!(DeviceFinder::by_id_priority("usb-Some_Keyboard-if01-event"), Some(50));
        assert_eq!(DeviceFinder::by_id_priority("usb-Razer_DeathAdder-event-mouse"), None);
        assert_eq!(DeviceFinder::by_id_priority("usb-Logitech_USB_Keyboard-kbd"), None);
    }
}
