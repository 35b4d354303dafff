use {
    anyhow::{bail, Context},
    crossbeam_channel::{unbounded, Receiver},
    log::{debug, error, warn},
    std::{
        io::BufRead,
        str::FromStr,
        thread::{spawn, JoinHandle},
    },
};

/// A single input event, parsed from one line of text.
///
/// Move directions are kept as written so that the camera decides whether they are valid.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Frame,
    Look { x_offset: f32, y_offset: f32 },
    Move { direction: String, dt: Option<f32> },
    Quit,
    Zoom { y_offset: f32 },
}

impl InputEvent {
    /// Parses one line, returning `None` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.split('#').next().unwrap_or_default().trim();

        if line.is_empty() {
            return Ok(None);
        }

        line.parse().map(Some)
    }
}

impl FromStr for InputEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn number(token: Option<&str>, name: &str) -> anyhow::Result<f32> {
            let token = token.with_context(|| format!("Missing {name}"))?;

            token
                .parse()
                .with_context(|| format!("Invalid {name} {token}"))
        }

        let mut tokens = s.split_whitespace();
        let keyword = tokens.next().context("Empty event")?.to_ascii_lowercase();

        let event = match keyword.as_str() {
            "frame" => Self::Frame,
            "look" => Self::Look {
                x_offset: number(tokens.next(), "x offset")?,
                y_offset: number(tokens.next(), "y offset")?,
            },
            "move" => Self::Move {
                direction: tokens.next().context("Missing direction")?.to_owned(),
                dt: tokens.next().map(|dt| number(Some(dt), "dt")).transpose()?,
            },
            "quit" => Self::Quit,
            "zoom" => Self::Zoom {
                y_offset: number(tokens.next(), "y offset")?,
            },
            _ => bail!("Unknown event {keyword}"),
        };

        if let Some(token) = tokens.next() {
            bail!("Unexpected {token}");
        }

        Ok(event)
    }
}

/// Reads events from `reader` on a new thread.
///
/// Lines which fail to parse are logged and skipped. The channel disconnects once the reader is
/// exhausted, fails, or after a `quit` event has been sent.
pub fn spawn_reader<R>(reader: R) -> (Receiver<InputEvent>, JoinHandle<()>)
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = unbounded();

    let thread = spawn(move || {
        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    error!("Unable to read input: {err}");
                    break;
                }
            };

            let event = match InputEvent::parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    warn!("Line {}: {err:#}", index + 1);
                    continue;
                }
            };

            let is_quit = event == InputEvent::Quit;

            if tx.send(event).is_err() {
                debug!("Input receiver closed");
                break;
            }

            if is_quit {
                break;
            }
        }
    });

    (rx, thread)
}
