//! Escape-sequence converter: a per-line state machine.
//!
//! [`EscapeConverter::convert`] is fed one rune at a time. It returns
//! `true` when the rune belongs to an escape sequence (the caller emits
//! nothing) and `false` when the rune is printable under the current
//! [`Pen`]. All state is per-line; the line builder creates a fresh
//! converter (sharing the document's [`SgrCache`]) for every line.

use std::sync::Arc;

use tracing::trace;

use strata_style::Style;

use crate::sgr::{SgrCache, apply_sgr};

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';

/// CSI parameter byte range. Runes outside it terminate the sequence.
const CSI_PARAM_START: char = '\u{20}';
const CSI_PARAM_END: char = '\u{3f}';

/// The working style state threaded through a line build.
#[derive(Debug, Clone, Default)]
pub struct Pen {
    /// Style applied to the next emitted cell.
    pub style: Style,
    /// Style for the cleared tail of the line (driven by `CSI K`).
    pub eol_style: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Ordinary text.
    Text,
    /// Seen ESC, waiting for the introducer.
    Esc,
    /// Inside a DCS/SOS/PM/APC string; consumed until the next ESC.
    Substring,
    /// Inside a control sequence, accumulating parameter bytes.
    Csi,
    /// Charset designation (`ESC (`): the next rune is swallowed.
    OtherSeq,
    /// Inside an operating system command.
    Osc,
    /// OSC 8 seen, expecting the parameter separator.
    OscHyperlink,
    /// Accumulating the OSC 8 id parameter.
    OscParam,
    /// Accumulating the OSC 8 URI.
    OscUrl,
}

/// Streaming escape-sequence interpreter.
#[derive(Debug, Clone)]
pub struct EscapeConverter {
    state: State,
    parameter: String,
    url: String,
    cache: SgrCache,
}

impl EscapeConverter {
    /// Create a converter in text state sharing the given SGR cache.
    #[must_use]
    pub fn new(cache: SgrCache) -> Self {
        Self {
            state: State::Text,
            parameter: String::new(),
            url: String::new(),
            cache,
        }
    }

    /// Reset to text state for reuse on another line.
    pub fn reset(&mut self) {
        self.state = State::Text;
        self.parameter.clear();
        self.url.clear();
    }

    /// Feed one rune. Returns `true` when the rune was consumed as part
    /// of an escape sequence; `false` means the caller should emit a
    /// cell with the pen's current style.
    pub fn convert(&mut self, ch: char, pen: &mut Pen) -> bool {
        if ch == '\n' {
            return false;
        }
        // ESC restarts sequence recognition from any state except the
        // URL collector, where it is the ST terminator's first half.
        if ch == ESC && self.state != State::OscUrl {
            self.state = State::Esc;
            return true;
        }
        match self.state {
            State::Text => false,
            State::Esc => self.escape(ch, pen),
            State::Substring => true,
            State::Csi => self.csi(ch, pen),
            State::OtherSeq => {
                self.state = State::Esc;
                true
            }
            State::Osc => self.osc(ch),
            State::OscHyperlink => self.osc_hyperlink(ch),
            State::OscParam => self.osc_param(ch, pen),
            State::OscUrl => self.osc_url(ch, pen),
        }
    }

    fn escape(&mut self, ch: char, pen: &mut Pen) -> bool {
        match ch {
            '[' => {
                self.parameter.clear();
                self.state = State::Csi;
                true
            }
            'c' => {
                // RIS: reset the pen.
                pen.style = Style::default();
                self.state = State::Text;
                true
            }
            ']' => {
                self.state = State::Osc;
                true
            }
            'P' | 'X' | '^' | '_' => {
                self.state = State::Substring;
                true
            }
            '(' => {
                self.state = State::OtherSeq;
                true
            }
            _ => {
                // Unknown introducer: the rune is ordinary text.
                self.state = State::Text;
                false
            }
        }
    }

    fn csi(&mut self, ch: char, pen: &mut Pen) -> bool {
        match ch {
            'm' => {
                pen.style = apply_sgr(&pen.style, &self.parameter, &self.cache);
            }
            'K' => {
                // EL with no parameter (or 0) keeps the pen's background
                // past the end of the line.
                if self.parameter.is_empty() || self.parameter == "0" {
                    pen.eol_style.bg = pen.style.bg;
                }
            }
            CSI_PARAM_START..=CSI_PARAM_END => {
                self.parameter.push(ch);
                return true;
            }
            'A'..='T' => {} // cursor movement: meaningless in a pager
            _ => {}         // unsupported final: drop the sequence
        }
        self.state = State::Text;
        true
    }

    fn osc(&mut self, ch: char) -> bool {
        match ch {
            '8' => self.state = State::OscHyperlink,
            '\\' | BEL => self.state = State::Text,
            _ => trace!("unexpected rune in OSC: {ch:?}"),
        }
        true
    }

    fn osc_hyperlink(&mut self, ch: char) -> bool {
        if ch == ';' {
            self.state = State::OscParam;
            return true;
        }
        self.state = State::Text;
        false
    }

    fn osc_param(&mut self, ch: char, pen: &mut Pen) -> bool {
        if ch != ';' {
            self.parameter.push(ch);
            return true;
        }
        if !self.parameter.is_empty() {
            pen.style.url_id = Some(Arc::from(self.parameter.as_str()));
        }
        self.parameter.clear();
        self.state = State::OscUrl;
        true
    }

    fn osc_url(&mut self, ch: char, pen: &mut Pen) -> bool {
        match ch {
            ESC | BEL => {
                self.commit_url(pen);
                self.state = if ch == ESC { State::Osc } else { State::Text };
                true
            }
            _ => {
                self.url.push(ch);
                true
            }
        }
    }

    fn commit_url(&mut self, pen: &mut Pen) {
        if self.url.is_empty() {
            // An empty URI terminates the hyperlink.
            pen.style.url = None;
            pen.style.url_id = None;
        } else {
            pen.style.url = Some(Arc::from(self.url.as_str()));
        }
        self.url.clear();
    }
}
