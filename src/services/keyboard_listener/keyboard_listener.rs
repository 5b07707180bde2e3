use crate::config::Config;
use crate::debug_if_enabled;
use crate::dom::{Document, NodeId};
use crate::error::{KocoError, Result};
use crate::events::{KeyEvent, KeyState};
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent, KeyCode, LedCode};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::key_mapping::{KeyMapper, UNIDENTIFIED_KEY};
use super::modifier_state::ModifierState;
use super::r#trait::KeyboardListenerTrait;

/// Пассивно читает evdev-клавиатуру (без эксклюзивного захвата) и рассылает
/// нажатия в документ от имени узла, представляющего устройство.
pub struct RealKeyboardListener {
    document: Arc<Document>,
    device: Device,
    target: NodeId,
    modifier_state: ModifierState,
}

impl RealKeyboardListener {
    pub fn new(config: Arc<Config>, document: Arc<Document>) -> Result<Self> {
        info!("Инициализация RealKeyboardListener");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            KocoError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let device_name = device.name().unwrap_or("Unknown").to_string();
        info!("Устройство: {}", device_name);
        info!("Физический путь: {:?}", device.physical_path());

        let caps_lock = device
            .get_led_state()
            .map(|leds| leds.contains(LedCode::LED_CAPSL))
            .unwrap_or(false);

        let target = document.create_element(format!("keyboard:{}", device_name), document.body())?;

        Ok(Self {
            document,
            device,
            target,
            modifier_state: ModifierState::with_caps_lock(caps_lock),
        })
    }

    async fn run_impl(self) -> Result<()> {
        info!("RealKeyboardListener запущен, начинаем чтение событий");

        let Self {
            document,
            device,
            target,
            mut modifier_state,
        } = self;

        let mut events = device.into_event_stream()?;

        loop {
            match events.next_event().await {
                Ok(event) => Self::handle_event(&document, target, &mut modifier_state, event),
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    fn handle_event(
        document: &Document,
        target: NodeId,
        modifier_state: &mut ModifierState,
        event: InputEvent,
    ) {
        if event.event_type() != EventType::KEY {
            return;
        }

        let key_code = KeyCode::new(event.code());
        let key_state = match event.value() {
            0 => KeyState::Released,
            1 => KeyState::Pressed,
            2 => KeyState::Repeat,
            value => {
                debug!("Неизвестное значение события: {}", value);
                return;
            }
        };

        modifier_state.update_key(key_code, key_state);

        // Безымянная клавиша всё равно прерывает ввод последовательности
        let key = KeyMapper::dom_key(key_code, modifier_state).unwrap_or_else(|| {
            debug_if_enabled!("Клавиша {:?} не имеет идентификатора DOM", key_code);
            UNIDENTIFIED_KEY.to_string()
        });

        document.dispatch_key_event(&KeyEvent::new(key, key_state, target));
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for RealKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
