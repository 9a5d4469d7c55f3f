//! Principal variation bookkeeping.

use std::fmt;

use super::super::{Move, Position};

/// How the search left the last node of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineTag {
    #[default]
    Plain,
    TtExact,
    TtUpper,
    TtLower,
    NullMove,
    ReverseFutility,
}

impl LineTag {
    fn abbreviation(self) -> Option<&'static str> {
        match self {
            LineTag::Plain => None,
            LineTag::TtExact => Some("PV"),
            LineTag::TtUpper => Some("UB"),
            LineTag::TtLower => Some("LB"),
            LineTag::NullMove => Some("NMP"),
            LineTag::ReverseFutility => Some("RFP"),
        }
    }
}

/// Best line found below a node: a move and the line below it, ending in a
/// node that carries a [`LineTag`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLine {
    best: Option<Move>,
    next: Option<Box<SearchLine>>,
    tag: LineTag,
}

impl SearchLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `mv` followed by `rest` the best line at this node.
    pub fn set(&mut self, mv: Move, rest: SearchLine) {
        self.best = Some(mv);
        self.next = Some(Box::new(rest));
        self.tag = LineTag::Plain;
    }

    /// Mark this node as cut short for `tag`.
    pub fn mark(&mut self, tag: LineTag) {
        self.best = None;
        self.next = None;
        self.tag = tag;
    }

    #[must_use]
    pub fn best(&self) -> Option<Move> {
        self.best
    }

    /// Tag of the last node in the line
    #[must_use]
    pub fn tag(&self) -> LineTag {
        let mut node = self;
        while let Some(next) = &node.next {
            node = next;
        }
        node.tag
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        let mut node = Some(self);
        std::iter::from_fn(move || {
            let current = node?;
            node = current.next.as_deref();
            current.best
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    /// Render the line in algebraic notation starting from `pos`.
    ///
    /// Stops early if a move no longer applies (the line is diagnostic).
    #[must_use]
    pub fn to_san(&self, pos: &Position) -> String {
        let mut pos = pos.clone();
        let mut parts = Vec::new();
        for mv in self.moves() {
            let san = pos.to_san(mv);
            if pos.apply(mv).is_err() {
                break;
            }
            parts.push(san);
        }
        if let Some(abbrev) = self.tag().abbreviation() {
            parts.push(abbrev.to_string());
        }
        parts.join(" ")
    }
}

impl fmt::Display for SearchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.moves().map(|m| m.to_string()).collect();
        if let Some(abbrev) = self.tag().abbreviation() {
            parts.push(abbrev.to_string());
        }
        f.write_str(&parts.join(" "))
    }
}
