use crate::utils::*;

/// What a user currently has on screen.
///
/// The session remembers only the latest successful [Run]. A request
/// that fails to parse leaves it untouched, and [Session::clear] wipes
/// the display without the allocator ever knowing.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Run>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses both lists and, if that works out, allocates from
    /// scratch and replaces whatever was displayed.
    pub fn submit(&mut self, blocks: &str, processes: &str) -> Result<&Run, InputError> {
        let (blocks, processes) = parse_request(blocks, processes)?;

        Ok(self.current.insert(first_fit(&blocks, &processes)))
    }

    pub fn current(&self) -> Option<&Run> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
