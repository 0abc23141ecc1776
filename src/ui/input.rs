use {
    crate::{
        record::Filter,
        view::{Action, Tab},
    },
    chrono::{DateTime, NaiveDate, NaiveTime},
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
};

/// Page sizes offered by `+` / `-`
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the filter prompt
    Filter(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Action),
    Quit,
    Nothing,
}

/// Keyboard state of the terminal front end
#[derive(Debug, Default)]
pub struct InputState {
    mode: InputMode,
    prompt_error: Option<String>,
}

impl InputState {
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn prompt_error(&self) -> Option<&str> {
        self.prompt_error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent, tab: Tab, page_size: usize) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }

        match &mut self.mode {
            InputMode::Filter(text) => match key.code {
                KeyCode::Esc => {
                    self.mode = InputMode::Normal;
                    Command::Nothing
                }
                KeyCode::Backspace => {
                    text.pop();
                    Command::Nothing
                }
                KeyCode::Char(c) => {
                    text.push(c);
                    Command::Nothing
                }
                KeyCode::Enter => match parse_filter_input(text) {
                    Ok(filter) => {
                        self.mode = InputMode::Normal;
                        self.prompt_error = None;
                        Command::Dispatch(Action::SubmitFilter(filter))
                    }
                    Err(e) => {
                        self.prompt_error = Some(e);
                        Command::Nothing
                    }
                },
                _ => Command::Nothing,
            },
            InputMode::Normal => self.handle_normal_key(key.code, tab, page_size),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, tab: Tab, page_size: usize) -> Command {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('1') => Command::Dispatch(Action::SelectTab(Tab::Swaps)),
            KeyCode::Char('2') => Command::Dispatch(Action::SelectTab(Tab::Transfers)),
            KeyCode::Char('3') => Command::Dispatch(Action::SelectTab(Tab::Historical)),
            KeyCode::Tab => Command::Dispatch(Action::SelectTab(next_tab(tab))),
            // The remaining keys drive the history list only
            _ if tab != Tab::Historical => Command::Nothing,
            KeyCode::Right | KeyCode::Char('n') => Command::Dispatch(Action::NextPage),
            KeyCode::Left | KeyCode::Char('p') => Command::Dispatch(Action::PreviousPage),
            KeyCode::Char('+') => step_page_size(page_size, true)
                .map(|size| Command::Dispatch(Action::SetPageSize(size)))
                .unwrap_or(Command::Nothing),
            KeyCode::Char('-') => step_page_size(page_size, false)
                .map(|size| Command::Dispatch(Action::SetPageSize(size)))
                .unwrap_or(Command::Nothing),
            KeyCode::Char('/') => {
                self.mode = InputMode::Filter(String::new());
                self.prompt_error = None;
                Command::Nothing
            }
            KeyCode::Char('c') => Command::Dispatch(Action::ClearFilter),
            KeyCode::Char('r') => Command::Dispatch(Action::Refresh),
            _ => Command::Nothing,
        }
    }
}

fn next_tab(tab: Tab) -> Tab {
    match tab {
        Tab::Swaps => Tab::Transfers,
        Tab::Transfers => Tab::Historical,
        Tab::Historical => Tab::Swaps,
    }
}

/// Neighbouring entry of `PAGE_SIZES`, if any
pub fn step_page_size(current: usize, larger: bool) -> Option<usize> {
    if larger {
        PAGE_SIZES.iter().copied().find(|size| *size > current)
    } else {
        PAGE_SIZES.iter().rev().copied().find(|size| *size < current)
    }
}

/// Parse the filter prompt
///
/// Tokens: a hash prefix, `from=<time>` and `to=<time>`, where a time is
/// epoch seconds, RFC 3339, or `YYYY-MM-DD` (start of day for `from`, end
/// of day for `to`). A lone bound is passed through; the list rejects it.
pub fn parse_filter_input(input: &str) -> Result<Filter, String> {
    let mut filter = Filter::default();

    for token in input.split_whitespace() {
        if let Some(value) = token.strip_prefix("from=") {
            filter.start_time = Some(parse_time(value, false)?);
        } else if let Some(value) = token.strip_prefix("to=") {
            filter.end_time = Some(parse_time(value, true)?);
        } else if filter.txhash.is_some() {
            return Err(format!("only one hash prefix allowed, got extra '{}'", token));
        } else {
            filter.txhash = Some(token.to_string());
        }
    }

    Ok(filter)
}

fn parse_time(value: &str, end_of_day: bool) -> Result<i64, String> {
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        };
        if let Some(time) = time {
            return Ok(date.and_time(time).and_utc().timestamp());
        }
    }
    Err(format!("cannot read '{}' as a time", value))
}

#[cfg(test)]
mod tests {
    use {super::*, crossterm::event::KeyEventKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn test_parse_hash_and_dates() {
        let filter = parse_filter_input("0xabc from=2024-01-01 to=2024-01-01").unwrap();
        assert_eq!(filter.txhash.as_deref(), Some("0xabc"));
        assert_eq!(filter.start_time, Some(1_704_067_200));
        assert_eq!(filter.end_time, Some(1_704_153_599));
    }

    #[test]
    fn test_parse_epoch_and_rfc3339() {
        let filter = parse_filter_input("from=1700000000 to=2023-11-15T00:00:00Z").unwrap();
        assert_eq!(filter.start_time, Some(1_700_000_000));
        assert_eq!(filter.end_time, Some(1_700_006_400));
        assert!(filter.txhash.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_filter_input("from=yesterday").is_err());
        assert!(parse_filter_input("0xaa 0xbb").is_err());
        assert_eq!(parse_filter_input("  ").unwrap(), Filter::default());
    }

    #[test]
    fn test_page_size_steps() {
        assert_eq!(step_page_size(50, true), Some(100));
        assert_eq!(step_page_size(50, false), Some(25));
        assert_eq!(step_page_size(100, true), None);
        assert_eq!(step_page_size(10, false), None);
        assert_eq!(step_page_size(30, false), Some(25));
    }

    #[test]
    fn test_list_keys_only_on_history_tab() {
        let mut input = InputState::default();
        assert_eq!(
            input.handle_key(key(KeyCode::Right), Tab::Swaps, 50),
            Command::Nothing
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Right), Tab::Historical, 50),
            Command::Dispatch(Action::NextPage)
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Char('3')), Tab::Swaps, 50),
            Command::Dispatch(Action::SelectTab(Tab::Historical))
        );
    }

    #[test]
    fn test_filter_prompt_submits_on_enter() {
        let mut input = InputState::default();
        input.handle_key(key(KeyCode::Char('/')), Tab::Historical, 50);
        for c in "0xab".chars() {
            input.handle_key(key(KeyCode::Char(c)), Tab::Historical, 50);
        }
        assert_eq!(input.mode(), &InputMode::Filter("0xab".to_string()));

        let command = input.handle_key(key(KeyCode::Enter), Tab::Historical, 50);
        assert_eq!(
            command,
            Command::Dispatch(Action::SubmitFilter(Filter::by_hash("0xab")))
        );
        assert_eq!(input.mode(), &InputMode::Normal);
    }
}
