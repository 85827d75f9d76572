//! Step wizard: a clamped cursor over an ordered, non-empty list of steps.

/// One screen of a multi-step flow: what kind of step it is, how it is titled,
/// and which form fields it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<K> {
    pub kind: K,
    pub label: &'static str,
    pub fields: &'static [&'static str],
}

impl<K> Step<K> {
    pub const fn new(kind: K, label: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            kind,
            label,
            fields,
        }
    }
}

/// What pressing "submit" should do on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Advance,
    Finalize,
}

/// Cursor over a flow's steps. Always holds at least one step, so the index is
/// valid from construction onward; moving past either end is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard<K> {
    steps: Vec<Step<K>>,
    index: usize,
}

impl<K> Wizard<K> {
    pub fn new(first: Step<K>, rest: impl IntoIterator<Item = Step<K>>) -> Self {
        let mut steps = vec![first];
        steps.extend(rest);
        Self { steps, index: 0 }
    }

    /// Moves forward one step. Returns `false` on the last step, which is sticky.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Moves back one step. Returns `false` on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step(&self) -> &Step<K> {
        &self.steps[self.index]
    }

    pub fn steps(&self) -> &[Step<K>] {
        &self.steps
    }

    pub fn submit_action(&self) -> SubmitAction {
        if self.is_last() {
            SubmitAction::Finalize
        } else {
            SubmitAction::Advance
        }
    }

    /// Only the current step's fields are presented and accept input.
    pub fn is_field_active(&self, key: &str) -> bool {
        self.current_step().fields.iter().any(|field| *field == key)
    }
}
