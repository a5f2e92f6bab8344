//! Damage arithmetic.

use crate::env::SyncRng;
use crate::stats::{AttributeKind, AttributeVector};

/// Rolls the damage of one blow.
///
/// # Formula
///
/// ```text
/// damage = max(basic - armor, 1) + piercing
/// damage -= rand % ((damage + 2) / 2)
/// ```
///
/// The random reduction keeps at least half of the rolled damage.
pub fn calculate_damage(
    attacker: &AttributeVector,
    target: &AttributeVector,
    rng: &mut SyncRng,
) -> i32 {
    let basic = attacker.value(AttributeKind::BasicDamage);
    let piercing = attacker.value(AttributeKind::PiercingDamage);
    let armor = target.value(AttributeKind::Armor);

    let damage = (basic - armor).max(1) + piercing.max(0);
    damage - rng.below((damage + 2) / 2)
}

/// Portion of `damage` absorbed by the shield.
///
/// `permeability` is the percentage that passes through the shield untouched.
/// Piercing attacks bypass the shield entirely.
pub fn shield_damage(shield: i32, permeability: i32, damage: i32, piercing: bool) -> i32 {
    if piercing {
        return 0;
    }
    let passes = i64::from(100 - permeability.clamp(0, 100));
    let absorbable = i64::from(damage) * passes / 100;
    i64::from(shield.max(0)).min(absorbable) as i32
}

/// True when the hit kills.
pub fn is_lethal(hp: i32, damage: i32, shield_damage: i32, piercing: bool) -> bool {
    hp == 0 || (piercing && hp <= damage) || hp <= damage - shield_damage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_absorbs_up_to_its_value() {
        // 40% passes through: 60 of 100 is absorbable, shield holds 50.
        let absorbed = shield_damage(50, 40, 100, false);
        assert_eq!(absorbed, 50);
        assert_eq!(100 - absorbed, 50);
    }

    #[test]
    fn huge_hits_do_not_overflow() {
        assert_eq!(shield_damage(i32::MAX, 40, i32::MAX, false), 1_288_490_188);
        assert_eq!(shield_damage(50, 0, 100_000_000, false), 50);
    }

    #[test]
    fn piercing_ignores_shield() {
        assert_eq!(shield_damage(50, 0, 100, true), 0);
    }

    #[test]
    fn bypass_kills_when_damage_covers_hp() {
        let absorbed = shield_damage(100, 0, 40, true);
        assert!(is_lethal(30, 40, absorbed, true));

        let absorbed = shield_damage(100, 0, 40, false);
        assert!(!is_lethal(30, 40, absorbed, false));
    }

    #[test]
    fn zero_hp_is_always_lethal() {
        assert!(is_lethal(0, 1, 1, false));
    }

    #[test]
    fn rolled_damage_keeps_at_least_half() {
        let attacker = AttributeVector::new()
            .with_value(AttributeKind::BasicDamage, 12)
            .with_value(AttributeKind::PiercingDamage, 4);
        let target = AttributeVector::new().with_value(AttributeKind::Armor, 2);
        let mut rng = SyncRng::new(11);
        for _ in 0..64 {
            let damage = calculate_damage(&attacker, &target, &mut rng);
            assert!((7..=14).contains(&damage), "damage {damage}");
        }
    }

    #[test]
    fn armor_never_drops_basic_below_one() {
        let attacker = AttributeVector::new().with_value(AttributeKind::BasicDamage, 3);
        let target = AttributeVector::new().with_value(AttributeKind::Armor, 50);
        let mut rng = SyncRng::new(5);
        assert_eq!(calculate_damage(&attacker, &target, &mut rng), 1);
    }
}
