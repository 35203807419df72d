//! Label and metric frame writers for the text exposition format.
//!
//! Every metric row is written in two steps: [`write_metric_start`] emits
//! `<metric_name><suffix>{<common labels>` and leaves the brace open, the
//! caller then appends any metric-specific labels and `} <value>\n`.

use std::borrow::Cow;
use std::io::{self, Write};

use esphome_common::{EntityInfo, EntityKey};

use crate::format::escape_label_value;
use crate::relabel::{ID_LABEL, NAME_LABEL, RelabelStore};

/// Whether a label list already holds a label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Separator {
    /// Nothing written yet, no comma needed.
    #[default]
    First,
    /// At least one label written, the next one needs a comma.
    Subsequent,
}

/// How label values are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelEscaping {
    /// Values are written as-is. A `"` or `\` in a value corrupts the line.
    #[default]
    Verbatim,
    /// `\`, `"` and newlines are escaped.
    Escaped,
}

/// Write a single `name="value"` pair.
pub fn write_label(
    out: &mut dyn Write,
    name: &str,
    value: &str,
    escaping: LabelEscaping,
) -> io::Result<()> {
    let value = match escaping {
        LabelEscaping::Verbatim => Cow::Borrowed(value),
        LabelEscaping::Escaped => escape_label_value(value),
    };
    write!(out, "{}=\"{}\"", name, value)
}

/// Comma-separated label list writer.
pub struct LabelSet<'w> {
    out: &'w mut dyn Write,
    escaping: LabelEscaping,
    separator: Separator,
}

impl<'w> LabelSet<'w> {
    /// Start an empty label list.
    pub fn new(out: &'w mut dyn Write, escaping: LabelEscaping) -> Self {
        Self {
            out,
            escaping,
            separator: Separator::First,
        }
    }

    /// Continue a list that already holds labels.
    pub fn continuing(out: &'w mut dyn Write, escaping: LabelEscaping) -> Self {
        Self {
            out,
            escaping,
            separator: Separator::Subsequent,
        }
    }

    /// Append a label, preceded by a comma unless it is the first.
    pub fn push(&mut self, name: &str, value: &str) -> io::Result<()> {
        if self.separator == Separator::Subsequent {
            self.out.write_all(b",")?;
        }
        self.separator = Separator::Subsequent;
        write_label(&mut *self.out, name, value, self.escaping)
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }
}

/// Write the common label set of an entity.
///
/// Overrides come first in store order, then `id` and `name` defaults for
/// whichever of the two no override supplied.
pub fn write_labels(
    out: &mut dyn Write,
    key: &EntityKey,
    info: &EntityInfo,
    relabel: &RelabelStore,
    escaping: LabelEscaping,
) -> io::Result<()> {
    let mut labels = LabelSet::new(out, escaping);
    let mut id_issued = false;
    let mut name_issued = false;

    for (name, value) in relabel.labels_for(key) {
        id_issued |= name == ID_LABEL;
        name_issued |= name == NAME_LABEL;
        labels.push(name, value)?;
    }

    if !id_issued {
        labels.push(ID_LABEL, &info.object_id)?;
    }
    if !name_issued {
        labels.push(NAME_LABEL, &info.name)?;
    }

    Ok(())
}

/// Write `<metric_name><suffix>{<common labels>` without the closing brace.
pub fn write_metric_start(
    out: &mut dyn Write,
    key: &EntityKey,
    info: &EntityInfo,
    relabel: &RelabelStore,
    escaping: LabelEscaping,
    metric_name: &str,
    suffix: &str,
) -> io::Result<()> {
    write!(out, "{}{}{{", metric_name, suffix)?;
    write_labels(out, key, info, relabel, escaping)
}
