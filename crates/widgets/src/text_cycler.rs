//! Typewriter text that types a word, pauses, deletes it and moves on to the
//! next word, forever.
//!
//! The automaton (`transition`) is pure; `TextCycler` only decides when it
//! ticks, by re-arming a single cancellable timer after every step.

use std::time::Duration;

use folio_clock::{TimerId, TimerQueue};
use folio_common::WidgetId;

use crate::WidgetError;
use crate::widget::{Lifecycle, MountContext, Widget, WidgetFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypewriterPhase {
    #[default]
    Typing,
    PausedAtFull,
    Deleting,
}

/// Observable state. `text` is always a prefix of the current word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypewriterState {
    pub word_index: usize,
    pub text: String,
    pub phase: TypewriterPhase,
}

/// Delay before the next tick, picked by the phase just entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub typing: Duration,
    pub deleting: Duration,
    pub pause: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            typing: Duration::from_millis(150),
            deleting: Duration::from_millis(100),
            pause: Duration::from_millis(1500),
        }
    }
}

impl TypewriterTiming {
    pub fn delay_for(&self, phase: TypewriterPhase) -> Duration {
        match phase {
            TypewriterPhase::Typing => self.typing,
            TypewriterPhase::PausedAtFull => self.pause,
            TypewriterPhase::Deleting => self.deleting,
        }
    }

    /// A zero delay would let a timer re-arm itself forever within one advance.
    pub fn validate(&self) -> Result<(), WidgetError> {
        for (name, delay) in [
            ("typing", self.typing),
            ("deleting", self.deleting),
            ("pause", self.pause),
        ] {
            if delay.is_zero() {
                return Err(WidgetError::ZeroDelay(name));
            }
        }
        Ok(())
    }
}

/// One tick of the typewriter.
///
/// Typing appends a character until the word is complete, then pauses.
/// The pause ends in deleting, which removes a character per tick until the
/// text is empty, then moves to the next word (wrapping) and types again.
/// `words` must be non-empty.
pub fn transition<S: AsRef<str>>(words: &[S], state: &TypewriterState) -> TypewriterState {
    let word = words[state.word_index % words.len()].as_ref();
    let typed = state.text.chars().count();
    let mut next = state.clone();
    match state.phase {
        TypewriterPhase::Typing => match word.chars().nth(typed) {
            Some(c) => next.text.push(c),
            None => next.phase = TypewriterPhase::PausedAtFull,
        },
        TypewriterPhase::PausedAtFull => next.phase = TypewriterPhase::Deleting,
        TypewriterPhase::Deleting => {
            if next.text.pop().is_none() {
                next.word_index = (state.word_index + 1) % words.len();
                next.phase = TypewriterPhase::Typing;
            }
        }
    }
    next
}

/// The typewriter automaton bound to its word list and timing.
#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<String>,
    timing: TypewriterTiming,
    state: TypewriterState,
}

impl Typewriter {
    pub fn new(words: Vec<String>, timing: TypewriterTiming) -> Result<Self, WidgetError> {
        if words.is_empty() {
            return Err(WidgetError::EmptyWordList);
        }
        timing.validate()?;
        Ok(Self {
            words,
            timing,
            state: TypewriterState::default(),
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn timing(&self) -> &TypewriterTiming {
        &self.timing
    }

    pub fn state(&self) -> &TypewriterState {
        &self.state
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.state.phase
    }

    pub fn word_index(&self) -> usize {
        self.state.word_index
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.state.word_index]
    }

    /// Delay until the next tick in the current phase.
    pub fn next_delay(&self) -> Duration {
        self.timing.delay_for(self.state.phase)
    }

    /// Apply one transition and return the delay before the next one.
    pub fn tick(&mut self) -> Duration {
        let next = transition(&self.words, &self.state);
        if next.phase != self.state.phase {
            tracing::debug!(
                word = next.word_index,
                from = ?self.state.phase,
                to = ?next.phase,
                "typewriter phase"
            );
        }
        self.state = next;
        self.next_delay()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub text: String,
    pub word_index: usize,
    pub phase: TypewriterPhase,
}

/// Widget driving a `Typewriter` from the host timer queue.
pub struct TextCycler {
    id: WidgetId,
    lifecycle: Lifecycle,
    machine: Typewriter,
    timer: Option<TimerId>,
}

impl TextCycler {
    pub fn new(words: Vec<String>, timing: TypewriterTiming) -> Result<Self, WidgetError> {
        Ok(Self {
            id: WidgetId::new(),
            lifecycle: Lifecycle::Created,
            machine: Typewriter::new(words, timing)?,
            timer: None,
        })
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.machine
    }

    pub fn text(&self) -> &str {
        self.machine.text()
    }

    /// The armed timer, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.timer
    }
}

impl Widget for TextCycler {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &'static str {
        "text-cycler"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.timer = Some(ctx.timers.schedule(self.id, self.machine.next_delay()));
        tracing::debug!(id = %self.id, words = self.machine.words().len(), "text cycler mounted");
    }

    fn on_timer(&mut self, timer: TimerId, timers: &mut TimerQueue) {
        if !self.is_alive() || self.timer != Some(timer) {
            return;
        }
        let delay = self.machine.tick();
        self.timer = Some(timers.schedule(self.id, delay));
    }

    fn dispose(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        if let Some(timer) = self.timer.take() {
            ctx.timers.cancel(timer);
        }
        ctx.release(self.id);
        self.lifecycle = Lifecycle::Disposed;
    }

    fn snapshot(&self) -> WidgetFrame {
        if !self.is_alive() {
            return WidgetFrame::Hidden;
        }
        let state = self.machine.state();
        WidgetFrame::Text(TextFrame {
            text: state.text.clone(),
            word_index: state.word_index,
            phase: state.phase,
        })
    }
}
