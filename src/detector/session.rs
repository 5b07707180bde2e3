use tokio::task::JoinHandle;

use super::sequence::TargetSequence;

/// Результат обработки одного нажатия
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Сессия остановлена, нажатие проигнорировано
    Inactive,
    /// Клавиша не совпала, прогресс сброшен
    Reset,
    /// Клавиша совпала, ждём следующую
    Progressed,
    /// Последовательность введена полностью, прогресс сброшен
    Completed,
}

/// Отложенный сброс прогресса по бездействию
#[derive(Debug)]
pub struct InactivityTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl InactivityTimer {
    pub fn new(generation: u64, handle: JoinHandle<()>) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

/// Изменяемое состояние одной активации: прогресс и не более одного таймера.
///
/// Инвариант: `0 <= progress < sequence.len()` между вызовами.
#[derive(Debug, Default)]
pub struct Session {
    progress: usize,
    timer: Option<InactivityTimer>,
    generation: u64,
    deactivated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Если таймер есть - отменить и забыть
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Шаг автомата для уже нормализованной клавиши.
    ///
    /// Несовпавшая клавиша не проверяется повторно на позиции 0: новую попытку
    /// начинает только следующее нажатие.
    pub fn advance(&mut self, sequence: &TargetSequence, normalized_key: &str) -> Advance {
        if self.deactivated {
            return Advance::Inactive;
        }

        self.cancel_timer();

        if !sequence.matches_at(self.progress, normalized_key) {
            self.progress = 0;
            return Advance::Reset;
        }

        self.progress += 1;

        if self.progress == sequence.len() {
            self.progress = 0;
            return Advance::Completed;
        }

        Advance::Progressed
    }

    /// Номер поколения для следующего таймера
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Установить новый таймер. Предыдущий, если есть, отменяется.
    pub fn arm_timer(&mut self, timer: InactivityTimer) {
        self.cancel_timer();
        if self.deactivated {
            timer.cancel();
            return;
        }
        self.timer = Some(timer);
    }

    /// Срабатывание таймера поколения `generation`. Устаревший таймер ничего
    /// не меняет и возвращает `false`.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.timer {
            Some(timer) if timer.generation() == generation => {
                self.timer = None;
                self.progress = 0;
                true
            }
            _ => false,
        }
    }

    /// Остановить сессию навсегда: таймер отменён, прогресс сброшен,
    /// дальнейшие нажатия игнорируются
    pub fn deactivate(&mut self) {
        self.deactivated = true;
        self.cancel_timer();
        self.progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::sequence::{normalize_key, KONAMI_CODE_SEQUENCE};

    fn feed(session: &mut Session, sequence: &TargetSequence, keys: &[&str]) -> Vec<Advance> {
        keys.iter()
            .map(|key| session.advance(sequence, &normalize_key(key)))
            .collect()
    }

    #[test]
    fn test_full_sequence_completes_and_resets() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();

        let results = feed(&mut session, &sequence, &KONAMI_CODE_SEQUENCE);

        assert_eq!(results.last(), Some(&Advance::Completed));
        assert_eq!(
            results.iter().filter(|r| **r == Advance::Progressed).count(),
            9
        );
        assert_eq!(session.progress(), 0);
    }

    #[test]
    fn test_mismatch_resets_progress() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();

        feed(&mut session, &sequence, &["ArrowUp", "ArrowUp", "ArrowDown"]);
        assert_eq!(session.progress(), 3);

        assert_eq!(session.advance(&sequence, "c"), Advance::Reset);
        assert_eq!(session.progress(), 0);
    }

    #[test]
    fn test_mismatched_first_key_does_not_restart_match() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();

        // Третья стрелка вверх не совпадает с ожидаемой стрелкой вниз и не
        // засчитывается как начало новой попытки.
        let results = feed(&mut session, &sequence, &["ArrowUp", "ArrowUp", "ArrowUp"]);
        assert_eq!(results[2], Advance::Reset);
        assert_eq!(session.progress(), 0);

        assert_eq!(session.advance(&sequence, "arrowup"), Advance::Progressed);
        assert_eq!(session.progress(), 1);
    }

    #[test]
    fn test_expire_ignores_stale_generation() {
        let mut session = Session::new();
        assert!(!session.expire(1));

        let generation = session.next_generation();
        assert_eq!(generation, 1);
        assert_ne!(session.next_generation(), generation);
    }

    #[test]
    fn test_deactivated_session_ignores_keys() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();
        feed(&mut session, &sequence, &["ArrowUp", "ArrowUp"]);

        session.deactivate();
        assert!(session.is_deactivated());
        assert_eq!(session.progress(), 0);

        let results = feed(&mut session, &sequence, &KONAMI_CODE_SEQUENCE);
        assert!(results.iter().all(|r| *r == Advance::Inactive));
        assert_eq!(session.progress(), 0);
    }

    #[tokio::test]
    async fn test_deactivated_session_rejects_new_timer() {
        let mut session = Session::new();
        session.deactivate();

        let generation = session.next_generation();
        session.arm_timer(InactivityTimer::new(
            generation,
            tokio::spawn(std::future::pending::<()>()),
        ));

        assert!(!session.has_pending_timer());
    }

    #[tokio::test]
    async fn test_arm_and_expire_timer() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();
        session.advance(&sequence, "arrowup");

        let generation = session.next_generation();
        session.arm_timer(InactivityTimer::new(generation, tokio::spawn(async {})));
        assert!(session.has_pending_timer());

        assert!(!session.expire(generation + 1));
        assert_eq!(session.progress(), 1);

        assert!(session.expire(generation));
        assert!(!session.has_pending_timer());
        assert_eq!(session.progress(), 0);
    }

    #[tokio::test]
    async fn test_advance_cancels_pending_timer() {
        let sequence = TargetSequence::konami_code(false);
        let mut session = Session::new();

        let generation = session.next_generation();
        session.arm_timer(InactivityTimer::new(
            generation,
            tokio::spawn(std::future::pending::<()>()),
        ));

        session.advance(&sequence, "x");
        assert!(!session.has_pending_timer());
        assert!(!session.expire(generation));
    }
}
