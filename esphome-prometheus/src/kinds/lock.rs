use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::render::RenderContext;

pub struct LockRenderer;

impl KindRenderer for LockRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Lock
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_lock"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_value"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Lock(lock) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &lock.info, self.default_prefix()) else {
            return Ok(());
        };

        row.gauge(out, "_value", lock.state as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::test_support::row;
    use esphome_common::{EntityInfo, Lock, LockState};

    #[test]
    fn test_lock_state_discriminant() {
        let lock = Lock {
            info: EntityInfo::new("front", "Front Lock"),
            state: LockState::Unlocked,
        };
        assert_eq!(
            row(&LockRenderer, lock),
            "esphome_lock_value{id=\"front\",name=\"Front Lock\"} 2\n"
        );
    }
}
