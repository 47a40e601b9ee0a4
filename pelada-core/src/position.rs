#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPosition {
    Goalkeeper,
    Defense,
    Midfield,
    Attack,
    Fullback,
}

impl FieldPosition {
    /// Bucket processing order; also the priority when a player lists
    /// several positions.
    pub const BUCKET_ORDER: [FieldPosition; 5] = [
        FieldPosition::Goalkeeper,
        FieldPosition::Defense,
        FieldPosition::Midfield,
        FieldPosition::Attack,
        FieldPosition::Fullback,
    ];

    /// Canonical directory label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldPosition::Goalkeeper => "Goleiro",
            FieldPosition::Defense => "Zagueiro",
            FieldPosition::Midfield => "Meia",
            FieldPosition::Attack => "Atacante",
            FieldPosition::Fullback => "Lateral",
        }
    }

    pub fn parse(label: &str) -> Option<FieldPosition> {
        match label.trim().to_lowercase().as_str() {
            "goleiro" | "goalkeeper" | "gk" => Some(FieldPosition::Goalkeeper),
            "zagueiro" | "zagueira" | "defesa" | "defensor" | "defense" | "defender" => {
                Some(FieldPosition::Defense)
            }
            "meia" | "meio-campo" | "meio campo" | "meio-campista" | "volante" | "midfield"
            | "midfielder" => Some(FieldPosition::Midfield),
            "atacante" | "ataque" | "attack" | "attacker" | "forward" => {
                Some(FieldPosition::Attack)
            }
            "lateral" | "ala" | "fullback" => Some(FieldPosition::Fullback),
            _ => None,
        }
    }

    /// The single bucket a player balances in: the highest-priority position
    /// they list, Midfield when they list none.
    pub fn bucket_for(positions: &[FieldPosition]) -> FieldPosition {
        for candidate in FieldPosition::BUCKET_ORDER {
            if positions.contains(&candidate) {
                return candidate;
            }
        }
        FieldPosition::Midfield
    }
}
