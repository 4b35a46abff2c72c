// src/services/ranks.rs
//! Streak rank table and milestone lookups. Pure lookups over a static
//! ascending table; the 0-day floor guarantees every streak has a rank.

/// One rank tier. `color` is a display weight the client maps to styling;
/// the engine only carries it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    pub days: u32,
    pub name: &'static str,
    pub color: &'static str,
}

/// Ordered by ascending `days`, starting at 0.
pub static RANKS: &[Rank] = &[
    Rank { days: 0, name: "Novice", color: "text-slate-400" },
    Rank { days: 3, name: "Apprentice", color: "text-emerald-400" },
    Rank { days: 7, name: "Disciplined", color: "text-blue-400" },
    Rank { days: 15, name: "Expert", color: "text-purple-400" },
    Rank { days: 21, name: "Master", color: "text-pink-400" },
    Rank { days: 30, name: "Legend", color: "text-amber-400" },
    Rank { days: 45, name: "Immortal", color: "text-red-500" },
    Rank { days: 90, name: "God", color: "text-white" },
];

/// Rank of the highest threshold not exceeding `streak`.
pub fn rank_of(streak: u32) -> &'static Rank {
    let mut current = &RANKS[0];
    for rank in RANKS {
        if streak >= rank.days {
            current = rank;
        } else {
            break;
        }
    }
    current
}

/// First tier strictly above `streak`, or `None` at max rank.
pub fn next_milestone(streak: u32) -> Option<&'static Rank> {
    RANKS.iter().find(|rank| rank.days > streak)
}
