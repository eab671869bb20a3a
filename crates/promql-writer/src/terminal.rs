use crate::error::WriteError;

/// Terminal size in character cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermDimensions {
    pub width: usize,
    pub height: usize,
}

impl TermDimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Query the size of the attached terminal
pub fn terminal_size() -> Result<TermDimensions, WriteError> {
    let (width, height) = crossterm::terminal::size().map_err(WriteError::TerminalSize)?;
    Ok(TermDimensions::new(width.into(), height.into()))
}
