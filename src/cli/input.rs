/// Minimal single-line editor backing the form fields.
#[derive(Default, Clone)]
pub struct LineEdit {
    pub value: String,
}

impl LineEdit {
    pub fn set(&mut self, s: impl Into<String>) {
        self.value = s.into();
    }

    pub fn push(&mut self, ch: char) {
        self.value.push(ch);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}
