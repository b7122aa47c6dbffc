//! FILENAME: core/band-engine/src/binding.rs
//! Bindings - The units a grouped stream emits.
//!
//! A binding is only valid at the moment it is received: aggregate payloads
//! are shared with the builder and keep changing until their group closes.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Header,
    Footer,
    Detail,
}

/// What a binding carries: the raw row for DETAIL, the live aggregate of the
/// level for HEADER and FOOTER.
pub enum Payload<R, A> {
    Row(Rc<R>),
    Aggregate(AggregateRef<A>),
}

impl<R, A> Clone for Payload<R, A> {
    fn clone(&self) -> Self {
        match self {
            Payload::Row(row) => Payload::Row(Rc::clone(row)),
            Payload::Aggregate(agg) => Payload::Aggregate(Rc::clone(agg)),
        }
    }
}

impl<R: fmt::Debug, A: fmt::Debug> fmt::Debug for Payload<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Row(row) => f.debug_tuple("Row").field(row).finish(),
            Payload::Aggregate(agg) => match agg.try_borrow() {
                Ok(agg) => f.debug_tuple("Aggregate").field(&*agg).finish(),
                Err(_) => f.write_str("Aggregate(<borrowed>)"),
            },
        }
    }
}

/// One emitted unit: (level, kind, payload).
pub struct Binding<R, A> {
    pub level: usize,
    pub kind: BindingKind,
    pub payload: Payload<R, A>,
    /// The row that opened the group (HEADER) or the last row of the group
    /// (FOOTER). None for DETAIL, whose payload already is the row.
    pub anchor: Option<Rc<R>>,
}

impl<R, A> Binding<R, A> {
    pub fn header(level: usize, aggregate: AggregateRef<A>, anchor: Rc<R>) -> Self {
        Binding {
            level,
            kind: BindingKind::Header,
            payload: Payload::Aggregate(aggregate),
            anchor: Some(anchor),
        }
    }

    pub fn footer(level: usize, aggregate: AggregateRef<A>, anchor: Rc<R>) -> Self {
        Binding {
            level,
            kind: BindingKind::Footer,
            payload: Payload::Aggregate(aggregate),
            anchor: Some(anchor),
        }
    }

    pub fn detail(row: Rc<R>) -> Self {
        Binding {
            level: 0,
            kind: BindingKind::Detail,
            payload: Payload::Row(row),
            anchor: None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == BindingKind::Header
    }

    pub fn is_footer(&self) -> bool {
        self.kind == BindingKind::Footer
    }

    pub fn is_detail(&self) -> bool {
        self.kind == BindingKind::Detail
    }

    /// The detail row, or None for HEADER/FOOTER.
    pub fn row(&self) -> Option<&R> {
        match &self.payload {
            Payload::Row(row) => Some(row),
            Payload::Aggregate(_) => None,
        }
    }

    /// The live aggregate, or None for DETAIL.
    pub fn aggregate(&self) -> Option<&AggregateRef<A>> {
        match &self.payload {
            Payload::Row(_) => None,
            Payload::Aggregate(agg) => Some(agg),
        }
    }

    /// The row this binding is about: the payload row for DETAIL, the anchor
    /// row otherwise.
    pub fn context_row(&self) -> Option<&R> {
        self.row().or(self.anchor.as_deref())
    }
}

impl<R, A> Clone for Binding<R, A> {
    fn clone(&self) -> Self {
        Binding {
            level: self.level,
            kind: self.kind,
            payload: self.payload.clone(),
            anchor: self.anchor.clone(),
        }
    }
}

impl<R: fmt::Debug, A: fmt::Debug> fmt::Debug for Binding<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("level", &self.level)
            .field("kind", &self.kind)
            .field("payload", &self.payload)
            .field("anchor", &self.anchor)
            .finish()
    }
}
