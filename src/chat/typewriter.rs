//! Typewriter reveal of an already-received reply
//!
//! Frame `i` is the first `i` whitespace tokens joined by single spaces, for
//! `i` in `0..=n`. Frames are shown `1 / speed` seconds apart.

use std::io::Write;
use std::thread;
use std::time::Duration;

/// Word-by-word reveal of a complete text
#[derive(Debug, Clone)]
pub struct Typewriter<'a> {
    tokens: Vec<&'a str>,
    speed: u32,
}

impl<'a> Typewriter<'a> {
    /// `speed` is tokens per second; 0 means no delay
    pub fn new(text: &'a str, speed: u32) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
            speed,
        }
    }

    /// Pause between two frames
    pub fn delay(&self) -> Duration {
        if self.speed == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(self.speed))
        }
    }

    /// All frames, from empty to the full text
    pub fn frames(&self) -> impl Iterator<Item = String> + '_ {
        (0..=self.tokens.len()).map(move |i| self.tokens[..i].join(" "))
    }

    /// Reveal frame by frame on an append-only writer.
    ///
    /// Each frame extends the previous one, so only the new suffix is
    /// written. Ends with a newline.
    pub fn play<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let delay = self.delay();
        let mut shown = 0;
        for frame in self.frames() {
            if frame.len() > shown {
                out.write_all(&frame.as_bytes()[shown..])?;
                out.flush()?;
                shown = frame.len();
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
        out.write_all(b"\n")?;
        out.flush()
    }
}
