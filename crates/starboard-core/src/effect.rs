//! Card effects
//!
//! The catalog of special cards is closed, so every effect is a variant of
//! [`CardEffect`] and [`resolve`] dispatches on it. Resolution is pure: it
//! reads the roster, consumes rolls from the random source and returns a list
//! of [`LedgerMutation`]s for the [`Ledger`](crate::Ledger) to apply, plus an
//! [`Outcome`] describing what happened for presentation.
//!
//! An effect never fails. A missing acting student, an empty dorm or a roster
//! with nobody left to target all resolve to an empty mutation list.

use crate::{RandomSource, Student, StudentId};
use serde::{Deserialize, Serialize};

const CHAIN_HIT_CHANCE: f64 = 0.5;
const CHAIN_MAX_HOPS: usize = 3;
const CHAIN_DAMAGE: i64 = 2;
const ABYSSAL_WIN_CHANCE: f64 = 0.3;
const ABYSSAL_BONUS: i64 = 3;
const DESTINY_WIN_CHANCE: f64 = 0.1;
const DESTINY_BONUS: i64 = 10;
const DESTINY_PENALTY: i64 = 1;
const MANA_DRAIN_AMOUNT: i64 = 2;
const MANA_DRAIN_BACKLASH: i64 = 1;
const ONE_MAN_GUARD_PENALTY: i64 = 1;
const STEALTH_CLOAK_TURNS: u32 = 3;
const SANCTUARY_TURNS: u32 = 1;

/// Effect program of a card, keyed by card name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardEffect {
    DoomsdayJudgment,
    MassSilence,
    LegionGlory,
    UniversalSalvation,
    ShadowRaid,
    ManaDrain,
    DarkCurse,
    Purification,
    AbyssalGaze,
    RoyalPk,
    ChainLightning,
    StealthCloak,
    BarrierSanctuary,
    OneManGuard,
    DestinyRoulette,
    BerserkerTrial,
    Bard,
    LifeElixir,
    BossTicket,
    /// Any card outside the special catalog; no ledger effect
    Flavor,
}

/// Which students an effect reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRule {
    /// Presentation only
    Nobody,
    /// The student who drew the card
    Acting,
    /// Students sharing the acting student's dorm, the acting student included
    Dormmates,
    /// The whole roster of the acting tenant
    Everyone,
    /// One random student other than the acting one, skipping immune students
    RandomOther,
    /// The acting student against one random other
    ActingVersusRandom,
    /// Starts at the acting student and hops to random others
    Chain,
}

impl CardEffect {
    pub const ALL: [CardEffect; 19] = [
        CardEffect::DoomsdayJudgment,
        CardEffect::MassSilence,
        CardEffect::LegionGlory,
        CardEffect::UniversalSalvation,
        CardEffect::ShadowRaid,
        CardEffect::ManaDrain,
        CardEffect::DarkCurse,
        CardEffect::Purification,
        CardEffect::AbyssalGaze,
        CardEffect::RoyalPk,
        CardEffect::ChainLightning,
        CardEffect::StealthCloak,
        CardEffect::BarrierSanctuary,
        CardEffect::OneManGuard,
        CardEffect::DestinyRoulette,
        CardEffect::BerserkerTrial,
        CardEffect::Bard,
        CardEffect::LifeElixir,
        CardEffect::BossTicket,
    ];

    /// Look up the effect of a catalog card by its name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|effect| effect.card_name() == Some(name))
            .unwrap_or(CardEffect::Flavor)
    }

    /// Catalog name of the card carrying this effect
    pub fn card_name(&self) -> Option<&'static str> {
        let name = match self {
            CardEffect::DoomsdayJudgment => "Doomsday Judgment",
            CardEffect::MassSilence => "Mass Silence",
            CardEffect::LegionGlory => "Legion Glory",
            CardEffect::UniversalSalvation => "Universal Salvation",
            CardEffect::ShadowRaid => "Shadow Raid",
            CardEffect::ManaDrain => "Mana Drain",
            CardEffect::DarkCurse => "Dark Curse",
            CardEffect::Purification => "Purification",
            CardEffect::AbyssalGaze => "Abyssal Gaze",
            CardEffect::RoyalPk => "Royal PK",
            CardEffect::ChainLightning => "Chain Lightning",
            CardEffect::StealthCloak => "Stealth Cloak",
            CardEffect::BarrierSanctuary => "Barrier Sanctuary",
            CardEffect::OneManGuard => "One Man Guard",
            CardEffect::DestinyRoulette => "Destiny Roulette",
            CardEffect::BerserkerTrial => "Berserker Trial",
            CardEffect::Bard => "Bard",
            CardEffect::LifeElixir => "Life Elixir",
            CardEffect::BossTicket => "Boss Ticket",
            CardEffect::Flavor => return None,
        };
        Some(name)
    }

    pub fn target_rule(&self) -> TargetRule {
        match self {
            CardEffect::DoomsdayJudgment | CardEffect::UniversalSalvation => TargetRule::Everyone,
            CardEffect::MassSilence | CardEffect::LegionGlory | CardEffect::BarrierSanctuary => {
                TargetRule::Dormmates
            }
            CardEffect::ShadowRaid | CardEffect::ManaDrain => TargetRule::RandomOther,
            CardEffect::RoyalPk => TargetRule::ActingVersusRandom,
            CardEffect::ChainLightning => TargetRule::Chain,
            CardEffect::DarkCurse
            | CardEffect::Purification
            | CardEffect::AbyssalGaze
            | CardEffect::StealthCloak
            | CardEffect::OneManGuard
            | CardEffect::DestinyRoulette => TargetRule::Acting,
            CardEffect::BerserkerTrial
            | CardEffect::Bard
            | CardEffect::LifeElixir
            | CardEffect::BossTicket
            | CardEffect::Flavor => TargetRule::Nobody,
        }
    }

    /// Whether resolution consumes rolls from the random source
    pub fn is_probabilistic(&self) -> bool {
        matches!(
            self.target_rule(),
            TargetRule::RandomOther | TargetRule::ActingVersusRandom | TargetRule::Chain
        ) || matches!(
            self,
            CardEffect::AbyssalGaze | CardEffect::DestinyRoulette | CardEffect::BerserkerTrial
        )
    }

    /// Whether the effect can change any student row
    pub fn mutates_ledger(&self) -> bool {
        self.target_rule() != TargetRule::Nobody
    }
}

/// A single change to one student row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Add stars; clamps at zero unless the student is cursed
    AdjustStars(i64),
    /// Overwrite stars; clamps at zero unless the student is cursed
    SetStars(i64),
    SetCursed(bool),
    SetImmunity(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMutation {
    pub student: StudentId,
    pub mutation: Mutation,
}

impl LedgerMutation {
    pub fn new(student: StudentId, mutation: Mutation) -> Self {
        Self { student, mutation }
    }
}

/// One bounce of Chain Lightning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHop {
    pub student: StudentId,
    pub hit: bool,
}

/// What happened, for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing to show beyond the card itself
    None,
    /// Students the effect was applied to
    Targets(Vec<StudentId>),
    /// Mana Drain: `drained` is false when the target had fewer than two stars
    Drain { target: StudentId, drained: bool },
    /// Abyssal Gaze and Destiny Roulette
    Fortune { won: bool },
    /// Royal PK
    Duel { opponent: StudentId, won: bool },
    Chain(Vec<ChainHop>),
    /// Berserker Trial: the student called up for the challenge
    Featured(StudentId),
}

/// Result of resolving one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub effect: CardEffect,
    pub mutations: Vec<LedgerMutation>,
    pub outcome: Outcome,
}

impl Resolution {
    fn noop(effect: CardEffect) -> Self {
        Self {
            effect,
            mutations: Vec::new(),
            outcome: Outcome::None,
        }
    }

    fn to_each(effect: CardEffect, targets: Vec<StudentId>, mutation: Mutation) -> Self {
        if targets.is_empty() {
            return Self::noop(effect);
        }
        Self {
            effect,
            mutations: targets
                .iter()
                .map(|&id| LedgerMutation::new(id, mutation))
                .collect(),
            outcome: Outcome::Targets(targets),
        }
    }

    fn to_acting(effect: CardEffect, acting: StudentId, mutations: Vec<Mutation>) -> Self {
        Self {
            effect,
            mutations: mutations
                .into_iter()
                .map(|m| LedgerMutation::new(acting, m))
                .collect(),
            outcome: Outcome::Targets(vec![acting]),
        }
    }

    /// Whether applying this resolution can change anything
    pub fn is_noop(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Resolve a card effect drawn by `acting` against the tenant's roster.
pub fn resolve<R>(effect: CardEffect, acting: StudentId, scope: &[Student], rng: &mut R) -> Resolution
where
    R: RandomSource + ?Sized,
{
    let Some(actor) = scope.iter().find(|s| s.id == acting) else {
        return Resolution::noop(effect);
    };

    match effect {
        CardEffect::DoomsdayJudgment => {
            Resolution::to_each(effect, everyone(scope), Mutation::AdjustStars(-1))
        }
        CardEffect::UniversalSalvation => {
            Resolution::to_each(effect, everyone(scope), Mutation::AdjustStars(1))
        }
        CardEffect::MassSilence => {
            Resolution::to_each(effect, dormmates(actor, scope), Mutation::AdjustStars(-1))
        }
        CardEffect::LegionGlory => {
            Resolution::to_each(effect, dormmates(actor, scope), Mutation::AdjustStars(1))
        }
        CardEffect::BarrierSanctuary => Resolution::to_each(
            effect,
            dormmates(actor, scope),
            Mutation::SetImmunity(SANCTUARY_TURNS),
        ),
        CardEffect::ShadowRaid => match pick_other(actor, scope, &[], rng) {
            Some(victim) => Resolution::to_each(effect, vec![victim.id], Mutation::AdjustStars(-1)),
            None => Resolution::noop(effect),
        },
        CardEffect::ManaDrain => resolve_mana_drain(actor, scope, rng),
        CardEffect::DarkCurse => {
            Resolution::to_acting(effect, acting, vec![Mutation::SetCursed(true)])
        }
        CardEffect::Purification => {
            let mut mutations = vec![Mutation::SetCursed(false)];
            if actor.stars < 0 {
                mutations.push(Mutation::SetStars(0));
            }
            Resolution::to_acting(effect, acting, mutations)
        }
        CardEffect::AbyssalGaze => {
            let won = rng.chance(ABYSSAL_WIN_CHANCE);
            let mutation = if won {
                Mutation::AdjustStars(ABYSSAL_BONUS)
            } else {
                Mutation::SetStars(0)
            };
            Resolution {
                outcome: Outcome::Fortune { won },
                ..Resolution::to_acting(effect, acting, vec![mutation])
            }
        }
        CardEffect::DestinyRoulette => {
            let won = rng.chance(DESTINY_WIN_CHANCE);
            let delta = if won { DESTINY_BONUS } else { -DESTINY_PENALTY };
            Resolution {
                outcome: Outcome::Fortune { won },
                ..Resolution::to_acting(effect, acting, vec![Mutation::AdjustStars(delta)])
            }
        }
        CardEffect::RoyalPk => resolve_royal_pk(actor, scope, rng),
        CardEffect::ChainLightning => resolve_chain_lightning(actor, scope, rng),
        CardEffect::StealthCloak => Resolution::to_acting(
            effect,
            acting,
            vec![Mutation::SetImmunity(STEALTH_CLOAK_TURNS)],
        ),
        CardEffect::OneManGuard => Resolution::to_acting(
            effect,
            acting,
            vec![Mutation::AdjustStars(-ONE_MAN_GUARD_PENALTY)],
        ),
        CardEffect::BerserkerTrial => match rng.index(scope.len()) {
            Some(i) => Resolution {
                outcome: Outcome::Featured(scope[i].id),
                ..Resolution::noop(effect)
            },
            None => Resolution::noop(effect),
        },
        CardEffect::Bard | CardEffect::LifeElixir | CardEffect::BossTicket | CardEffect::Flavor => {
            Resolution::noop(effect)
        }
    }
}

fn everyone(scope: &[Student]) -> Vec<StudentId> {
    scope.iter().map(|s| s.id).collect()
}

fn dormmates(actor: &Student, scope: &[Student]) -> Vec<StudentId> {
    scope
        .iter()
        .filter(|s| actor.shares_dorm_with(s))
        .map(|s| s.id)
        .collect()
}

/// Uniform pick among students other than `actor`, skipping immune students
/// and anyone in `visited`.
fn pick_other<'a, R>(
    actor: &Student,
    scope: &'a [Student],
    visited: &[StudentId],
    rng: &mut R,
) -> Option<&'a Student>
where
    R: RandomSource + ?Sized,
{
    let candidates: Vec<&Student> = scope
        .iter()
        .filter(|s| s.id != actor.id && !s.is_immune() && !visited.contains(&s.id))
        .collect();
    rng.index(candidates.len()).map(|i| candidates[i])
}

fn resolve_mana_drain<R>(actor: &Student, scope: &[Student], rng: &mut R) -> Resolution
where
    R: RandomSource + ?Sized,
{
    let Some(target) = pick_other(actor, scope, &[], rng) else {
        return Resolution::noop(CardEffect::ManaDrain);
    };
    let drained = target.stars >= MANA_DRAIN_AMOUNT;
    let amount = if drained {
        MANA_DRAIN_AMOUNT
    } else {
        MANA_DRAIN_BACKLASH
    };
    Resolution {
        effect: CardEffect::ManaDrain,
        mutations: vec![LedgerMutation::new(target.id, Mutation::AdjustStars(-amount))],
        outcome: Outcome::Drain {
            target: target.id,
            drained,
        },
    }
}

fn resolve_royal_pk<R>(actor: &Student, scope: &[Student], rng: &mut R) -> Resolution
where
    R: RandomSource + ?Sized,
{
    let Some(opponent) = pick_other(actor, scope, &[], rng) else {
        return Resolution::noop(CardEffect::RoyalPk);
    };
    let won = actor.stars > opponent.stars;
    let mutations = if won {
        vec![LedgerMutation::new(actor.id, Mutation::AdjustStars(1))]
    } else {
        Vec::new()
    };
    Resolution {
        effect: CardEffect::RoyalPk,
        mutations,
        outcome: Outcome::Duel {
            opponent: opponent.id,
            won,
        },
    }
}

/// Each hop strikes with fixed probability and stops; a miss passes the bolt
/// to a random student not yet visited. The chain ends after the last hop or
/// when nobody is left to jump to.
fn resolve_chain_lightning<R>(actor: &Student, scope: &[Student], rng: &mut R) -> Resolution
where
    R: RandomSource + ?Sized,
{
    let mut path: Vec<ChainHop> = Vec::with_capacity(CHAIN_MAX_HOPS);
    let mut visited = vec![actor.id];
    let mut current = actor.id;
    let mut mutations = Vec::new();

    for hop in 0..CHAIN_MAX_HOPS {
        let hit = rng.chance(CHAIN_HIT_CHANCE);
        path.push(ChainHop {
            student: current,
            hit,
        });
        if hit {
            mutations.push(LedgerMutation::new(
                current,
                Mutation::AdjustStars(-CHAIN_DAMAGE),
            ));
            break;
        }
        if hop + 1 == CHAIN_MAX_HOPS {
            break;
        }
        match pick_other(actor, scope, &visited, rng) {
            Some(next) => {
                visited.push(next.id);
                current = next.id;
            }
            None => break,
        }
    }

    Resolution {
        effect: CardEffect::ChainLightning,
        mutations,
        outcome: Outcome::Chain(path),
    }
}
