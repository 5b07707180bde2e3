use smallvec::SmallVec;

/// Легендарная последовательность Konami Code в виде идентификаторов клавиш DOM
pub const KONAMI_CODE_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Клавиша подтверждения, добавляемая в конец при `require_confirm_key`
pub const CONFIRM_KEY: &str = "Enter";

/// Приведение идентификатора клавиши к единому регистру
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Ожидаемая последовательность, нормализованная один раз при создании
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    keys: SmallVec<[String; 11]>,
}

impl TargetSequence {
    pub fn konami_code(require_confirm_key: bool) -> Self {
        let mut keys: SmallVec<[String; 11]> =
            KONAMI_CODE_SEQUENCE.iter().map(|key| normalize_key(key)).collect();

        if require_confirm_key {
            keys.push(normalize_key(CONFIRM_KEY));
        }

        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Совпадает ли уже нормализованная клавиша с позицией `position`
    pub fn matches_at(&self, position: usize, normalized_key: &str) -> bool {
        self.keys
            .get(position)
            .is_some_and(|expected| expected == normalized_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
