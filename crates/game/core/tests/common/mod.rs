#![allow(dead_code)]

use skirmish_core::{
    Applicability, AttributeKind, AttributeModifier, Catalog, CombatObserver, DomainSet, Env,
    FactionId, FactionKind, GameConfig, GameEngine, GameState, MapDimensions, Position,
    ResourceKind, Resources, ScriptHooks, SightFootprint, UnitId, UnitState, UnitStatus, UnitType,
    UnitTypeFlags, UnitTypeId, Upgrade, UpgradeId, UpgradeModifier, UpgradeStacking, VisibilityIndex,
    WeaponClass,
};

pub const FOOTMAN: UnitTypeId = UnitTypeId(1);
pub const PEASANT: UnitTypeId = UnitTypeId(2);
pub const FARM: UnitTypeId = UnitTypeId(3);
pub const KNIGHT: UnitTypeId = UnitTypeId(4);
pub const MAGE: UnitTypeId = UnitTypeId(5);
pub const GUARDIAN: UnitTypeId = UnitTypeId(6);
pub const MILITIA: UnitTypeId = UnitTypeId(7);

pub const SHARP_SWORDS: UpgradeId = UpgradeId(1);
pub const PLATE_ARMOR: UpgradeId = UpgradeId(2);
pub const EAGLE_EYE: UpgradeId = UpgradeId(3);
pub const MANA_GEM: UpgradeId = UpgradeId(4);
pub const PROMOTION: UpgradeId = UpgradeId(5);
pub const RUNED_SWORDS: UpgradeId = UpgradeId(6);
pub const VOLLEY: UpgradeId = UpgradeId(7);
pub const BLESSING: UpgradeId = UpgradeId(8);

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let types = [
        UnitType::builder(FOOTMAN, "footman")
            .flags(UnitTypeFlags::CAN_ATTACK)
            .attribute(AttributeKind::HitPoints, 60, 60)
            .stat(AttributeKind::Armor, 2)
            .stat(AttributeKind::BasicDamage, 6)
            .stat(AttributeKind::PiercingDamage, 3)
            .stat(AttributeKind::SightRange, 4)
            .stat(AttributeKind::NightSightRangeBonus, -1)
            .stat(AttributeKind::AttackRange, 1)
            .stat(AttributeKind::ReactionRange, 6)
            .stat(AttributeKind::Speed, 10)
            .stat(AttributeKind::Points, 50)
            .stat(AttributeKind::Level, 1)
            .costs(Resources::ZERO.with(ResourceKind::Copper, 600))
            .demand(1)
            .weapon(WeaponClass::Sword)
            .build(),
        UnitType::builder(PEASANT, "peasant")
            .flags(UnitTypeFlags::CAN_REPAIR)
            .attribute(AttributeKind::HitPoints, 30, 30)
            .regeneration(AttributeKind::HitPoints, 1)
            .stat(AttributeKind::SightRange, 4)
            .stat(AttributeKind::Speed, 10)
            .stat(AttributeKind::Points, 30)
            .costs(Resources::ZERO.with(ResourceKind::Copper, 400))
            .demand(1)
            .build(),
        UnitType::builder(FARM, "farm")
            .flags(UnitTypeFlags::BUILDING)
            .size(2)
            .attribute(AttributeKind::HitPoints, 400, 400)
            .stat(AttributeKind::Supply, 4)
            .stat(AttributeKind::SightRange, 3)
            .stat(AttributeKind::Points, 100)
            .costs(
                Resources::ZERO
                    .with(ResourceKind::Copper, 500)
                    .with(ResourceKind::Lumber, 250),
            )
            .build(),
        UnitType::builder(KNIGHT, "knight")
            .flags(UnitTypeFlags::CAN_ATTACK)
            .attribute(AttributeKind::HitPoints, 90, 90)
            .stat(AttributeKind::Armor, 4)
            .stat(AttributeKind::BasicDamage, 8)
            .stat(AttributeKind::SightRange, 5)
            .stat(AttributeKind::AttackRange, 1)
            .stat(AttributeKind::Speed, 13)
            .stat(AttributeKind::Points, 100)
            .stat(AttributeKind::Level, 1)
            .demand(1)
            .build(),
        UnitType::builder(MAGE, "mage")
            .flags(UnitTypeFlags::CAN_ATTACK)
            .attribute(AttributeKind::HitPoints, 40, 40)
            .attribute(AttributeKind::Mana, 50, 100)
            .stat(AttributeKind::SightRange, 9)
            .stat(AttributeKind::Speed, 8)
            .demand(1)
            .weapon(WeaponClass::Staff)
            .build(),
        UnitType::builder(GUARDIAN, "guardian")
            .can_target(DomainSet::empty())
            .attribute(AttributeKind::HitPoints, 200, 200)
            .attribute(AttributeKind::Shield, 50, 50)
            .stat(AttributeKind::ShieldPermeability, 40)
            .stat(AttributeKind::SightRange, 2)
            .build(),
        UnitType::builder(MILITIA, "militia")
            .flags(UnitTypeFlags::CAN_ATTACK | UnitTypeFlags::COWARD | UnitTypeFlags::HAS_INVENTORY)
            .attribute(AttributeKind::HitPoints, 50, 50)
            .stat(AttributeKind::BasicDamage, 3)
            .stat(AttributeKind::SightRange, 4)
            .stat(AttributeKind::AttackRange, 1)
            .stat(AttributeKind::ReactionRange, 6)
            .stat(AttributeKind::Speed, 10)
            .stat(AttributeKind::Points, 20)
            .demand(1)
            .build(),
    ];
    for unit_type in types {
        catalog.add_unit_type(unit_type).expect("unique unit type");
    }

    let upgrades = [
        Upgrade::new(SHARP_SWORDS, "sharp_swords").modifier(
            UpgradeModifier::new(Applicability::only([FOOTMAN]))
                .attribute(AttributeModifier::additive(AttributeKind::BasicDamage, 2, 0)),
        ),
        Upgrade::new(PLATE_ARMOR, "plate_armor").modifier(
            UpgradeModifier::new(Applicability::AnyUnitType)
                .attribute(AttributeModifier::additive(AttributeKind::Armor, 1, 0))
                .attribute(AttributeModifier::percent(AttributeKind::HitPoints, 10)),
        ),
        Upgrade::new(EAGLE_EYE, "eagle_eye").modifier(
            UpgradeModifier::new(Applicability::AnyUnitType)
                .attribute(AttributeModifier::additive(AttributeKind::SightRange, 2, 0)),
        ),
        Upgrade::new(MANA_GEM, "mana_gem").modifier(
            UpgradeModifier::new(Applicability::AnyUnitType)
                .attribute(AttributeModifier::additive(AttributeKind::Mana, 20, 20)),
        ),
        Upgrade::new(PROMOTION, "promotion")
            .modifier(UpgradeModifier::new(Applicability::only([FOOTMAN])).convert_to(KNIGHT)),
        Upgrade::new(RUNED_SWORDS, "runed_swords").modifier(
            UpgradeModifier::new(Applicability::only([FOOTMAN]))
                .attribute(AttributeModifier::additive(AttributeKind::BasicDamage, 4, 0))
                .removes(SHARP_SWORDS),
        ),
        Upgrade::new(VOLLEY, "volley").ability([WeaponClass::Bow]).modifier(
            UpgradeModifier::new(Applicability::AnyUnitType)
                .attribute(AttributeModifier::additive(AttributeKind::PiercingDamage, 2, 0)),
        ),
        Upgrade::new(BLESSING, "blessing")
            .stacking(UpgradeStacking::Cumulative)
            .modifier(
                UpgradeModifier::new(Applicability::AnyUnitType)
                    .attribute(AttributeModifier::additive(AttributeKind::Armor, 1, 0)),
            ),
    ];
    for upgrade in upgrades {
        catalog.add_upgrade(upgrade).expect("unique upgrade");
    }
    catalog.link().expect("catalog links");
    catalog
}

/// Visibility index that tracks which footprints are currently marked.
#[derive(Default)]
pub struct VisionLog {
    pub active: Vec<SightFootprint>,
    pub marks: usize,
    pub stray_unmarks: usize,
}

impl VisionLog {
    pub fn footprint_at(&self, position: Position) -> Option<&SightFootprint> {
        self.active.iter().find(|f| f.position == position)
    }
}

impl VisibilityIndex for VisionLog {
    fn mark(&mut self, footprint: &SightFootprint) {
        self.marks += 1;
        self.active.push(*footprint);
    }

    fn unmark(&mut self, footprint: &SightFootprint) {
        match self.active.iter().position(|f| f == footprint) {
            Some(index) => {
                self.active.remove(index);
            }
            None => self.stray_unmarks += 1,
        }
    }
}

/// Script double: records calls and optionally kills the target on impact.
#[derive(Default)]
pub struct HookLog {
    pub calls: Vec<&'static str>,
    pub kill_on_impact: bool,
    pub heal_on_hit: i32,
}

impl ScriptHooks for HookLog {
    fn on_hit(
        &mut self,
        state: &mut GameState,
        _attacker: Option<UnitId>,
        target: UnitId,
        _damage: i32,
    ) {
        self.calls.push("hit");
        if self.heal_on_hit > 0 {
            if let Some(unit) = state.unit_mut(target) {
                unit.attributes
                    .add_value(AttributeKind::HitPoints, self.heal_on_hit);
            }
        }
    }

    fn on_impact(
        &mut self,
        state: &mut GameState,
        _attacker: Option<UnitId>,
        target: UnitId,
        _damage: i32,
    ) {
        self.calls.push("impact");
        if self.kill_on_impact {
            if let Some(unit) = state.unit_mut(target) {
                unit.order = skirmish_core::UnitOrder::Die;
            }
        }
    }

    fn on_death(&mut self, _state: &mut GameState, _target: UnitId, _destroyer: Option<UnitId>) {
        self.calls.push("death");
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    UnderAttack(FactionId, UnitId),
    Reinforcements(FactionId, UnitId, UnitId),
    Heal(UnitId),
    Burning(UnitId),
    Killed(UnitId, Option<UnitId>),
    OwnerChanged(UnitId, FactionId, FactionId),
}

#[derive(Default)]
pub struct ObserverLog {
    pub events: Vec<Event>,
}

impl ObserverLog {
    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }
}

impl CombatObserver for ObserverLog {
    fn under_attack(&mut self, owner: FactionId, target: UnitId, _position: Position) {
        self.events.push(Event::UnderAttack(owner, target));
    }

    fn request_reinforcements(&mut self, owner: FactionId, target: UnitId, attacker: UnitId) {
        self.events
            .push(Event::Reinforcements(owner, target, attacker));
    }

    fn use_healing_item(&mut self, unit: UnitId) {
        self.events.push(Event::Heal(unit));
    }

    fn burning_started(&mut self, unit: UnitId) {
        self.events.push(Event::Burning(unit));
    }

    fn unit_killed(&mut self, victim: UnitId, destroyer: Option<UnitId>) {
        self.events.push(Event::Killed(victim, destroyer));
    }

    fn ownership_changed(&mut self, unit: UnitId, from: FactionId, to: FactionId) {
        self.events.push(Event::OwnerChanged(unit, from, to));
    }
}

/// Two warring factions on a 64x64 map: `red` is a person, `blue` a computer.
pub struct World {
    pub state: GameState,
    pub catalog: Catalog,
    pub vision: VisionLog,
    pub hooks: HookLog,
    pub observer: ObserverLog,
    pub red: FactionId,
    pub blue: FactionId,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut state = GameState::new(MapDimensions::new(64, 64), config, 42);
        let red = state.add_faction(FactionKind::Person);
        let blue = state.add_faction(FactionKind::Computer);
        state.declare_war(red, blue).expect("factions exist");
        Self {
            state,
            catalog: catalog(),
            vision: VisionLog::default(),
            hooks: HookLog::default(),
            observer: ObserverLog::default(),
            red,
            blue,
        }
    }

    /// Engine and environment over disjoint parts of the world.
    pub fn parts(&mut self) -> (GameEngine<'_>, Env<'_>) {
        (
            GameEngine::new(&mut self.state),
            Env::new(
                &self.catalog,
                &mut self.vision,
                &mut self.hooks,
                &mut self.observer,
            ),
        )
    }

    pub fn spawn(&mut self, owner: FactionId, unit_type: UnitTypeId, x: i32, y: i32) -> UnitId {
        let (mut engine, mut env) = self.parts();
        engine
            .spawn_unit(
                &mut env,
                owner,
                unit_type,
                Position::new(x, y),
                UnitStatus::empty(),
            )
            .expect("spawn")
    }

    pub fn unit(&self, id: UnitId) -> &UnitState {
        self.state.unit(id).expect("unit exists")
    }

    pub fn set(&mut self, id: UnitId, kind: AttributeKind, value: i32) {
        self.state
            .require_unit_mut(id)
            .expect("unit exists")
            .attributes
            .set_value(kind, value);
    }
}
