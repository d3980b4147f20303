//! Hard-coded catalog of the four South American camelids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four species the classifier reports on.
///
/// The declaration order is the order of every probability vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Alpaca,
    Guanaco,
    Llama,
    Vicuna,
}

/// Static description of a species, shown on the species cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub scientific_name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub status: &'static str,
    /// Accent colour of the card border and title, as RGB.
    pub accent: [u8; 3],
    /// Card background, as RGB.
    pub background: [u8; 3],
    /// Average height at the withers.
    pub height: &'static str,
    /// Bar width in the size comparison, relative to the llama.
    pub relative_height: u8,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Alpaca,
        Species::Guanaco,
        Species::Llama,
        Species::Vicuna,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn info(self) -> &'static SpeciesInfo {
        &CATALOG[self.index()]
    }

    /// Parses a label such as `"vicuña"`, `"Vicuna"` or `" LLAMA "`.
    pub fn from_label(label: &str) -> Option<Species> {
        let folded: String = label
            .trim()
            .chars()
            .map(|c| match c {
                'ñ' | 'Ñ' => 'n',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match folded.as_str() {
            "alpaca" => Some(Species::Alpaca),
            "guanaco" => Some(Species::Guanaco),
            "llama" => Some(Species::Llama),
            "vicuna" => Some(Species::Vicuna),
            _ => None,
        }
    }

    /// Species ordered from tallest to shortest, for the size comparison.
    pub fn by_height() -> [Species; 4] {
        let mut all = Species::ALL;
        all.sort_by(|a, b| b.info().relative_height.cmp(&a.info().relative_height));
        all
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CATALOG: [SpeciesInfo; 4] = [
    SpeciesInfo {
        name: "Alpaca",
        icon: "🐑",
        scientific_name: "Vicugna pacos",
        description: "Más pequeña que la llama, con una silueta más curvilínea. Posee un clásico mechón de fibra en la frente.",
        usage: "Criada por su valiosa fibra, considerada una de las más finas y suaves del mundo.",
        status: "Doméstica.",
        accent: [0x2e, 0x7d, 0x32],
        background: [0xe8, 0xf5, 0xe9],
        height: "0.8-1.0 m",
        relative_height: 55,
    },
    SpeciesInfo {
        name: "Guanaco",
        icon: "🦌",
        scientific_name: "Lama guanicoe",
        description: "Silvestre, con pelaje denso de color marrón-rojizo claro y el vientre blanquecino. Es el antepasado silvestre de la llama.",
        usage: "No tiene un uso económico principal, pero es una especie importante por su valor ecológico.",
        status: "Silvestre.",
        accent: [0x15, 0x65, 0xc0],
        background: [0xe3, 0xf2, 0xfd],
        height: "1.0-1.2 m",
        relative_height: 70,
    },
    SpeciesInfo {
        name: "Llama",
        icon: "🦙",
        scientific_name: "Lama glama",
        description: "Es el camélido doméstico de mayor tamaño y peso, con patas largas, orejas prominentes y curvadas, y pelaje grueso y áspero.",
        usage: "Se utiliza como animal de carga para el transporte y, en menor medida, por su lana y carne.",
        status: "Doméstica.",
        accent: [0xc2, 0x18, 0x5b],
        background: [0xfc, 0xe4, 0xec],
        height: "1.7-1.8 m",
        relative_height: 100,
    },
    SpeciesInfo {
        name: "Vicuña",
        icon: "🐾",
        scientific_name: "Vicugna vicugna",
        description: "La más pequeña de los camélidos andinos, con cuerpo grácil y movimientos ágiles. Posee pelaje muy fino y brillante, de color marrón claro en el lomo y blanquecino en el pecho.",
        usage: "Su fibra es considerada la más fina del mundo, y se aprovecha en la industria textil de lujo.",
        status: "Silvestre y protegida tras un peligro de extinción.",
        accent: [0xef, 0x6c, 0x00],
        background: [0xff, 0xf3, 0xe0],
        height: "0.7-0.9 m",
        relative_height: 45,
    },
];

/// Citation shown above the taxonomy tree.
pub const TAXONOMY_SOURCE: &str = "La familia Camelidae está formada por dos tribus: los Camelini y los Lamini (Stanley et al., 1994; Wheeler, 1995).";

/// Family tree of Camelidae, rendered in a monospace box.
pub const TAXONOMY: &str = "\
Tribu Camelini
└── GÉNERO: Camelus
    ├── Camelus bactrianus → CAMELLO
    └── Camelus dromedarius → DROMEDARIO

Tribu Lamini
├── GÉNERO: Lama
│   ├── Lama guanicoe → GUANACO
│   └── Lama glama → LLAMA
└── GÉNERO: Vicugna
    ├── Vicugna vicugna → VICUÑA
    └── Vicugna pacos → ALPACA";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn catalog_order_matches_enum() {
        for (i, species) in Species::ALL.iter().enumerate() {
            assert_eq!(species.index(), i);
            assert_eq!(Species::from_label(species.name()), Some(*species));
        }
    }

    #[rstest]
    #[case("vicuña", Some(Species::Vicuna))]
    #[case("VICUNA", Some(Species::Vicuna))]
    #[case("  llama\n", Some(Species::Llama))]
    #[case("Guanaco", Some(Species::Guanaco))]
    #[case("dromedario", None)]
    #[case("", None)]
    fn from_label_folds_case_and_tilde(#[case] label: &str, #[case] expected: Option<Species>) {
        assert_eq!(Species::from_label(label), expected);
    }

    #[test]
    fn by_height_is_tallest_first() {
        assert_eq!(
            Species::by_height(),
            [
                Species::Llama,
                Species::Guanaco,
                Species::Alpaca,
                Species::Vicuna
            ]
        );
    }

    #[test]
    fn taxonomy_mentions_every_species() {
        for species in Species::ALL {
            let upper = species.name().to_uppercase();
            assert!(TAXONOMY.contains(&upper), "missing {upper}");
            assert!(TAXONOMY.contains(species.info().scientific_name));
        }
    }
}
