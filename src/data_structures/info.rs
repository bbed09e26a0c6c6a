//! Static descriptive records shown when an entity is clicked.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRecord {
    pub title: &'static str,
    pub date: &'static str,
    pub description: &'static str,
}

const SATELLITES: &[(&str, InfoRecord)] = &[
    (
        "Sputnik",
        InfoRecord {
            title: "Sputnik 1",
            date: "Launched 4 October 1957",
            description: "The first artificial Earth satellite. A polished 58 cm sphere with four \
                external radio antennas, it broadcast radio pulses for three weeks before its \
                batteries died and re-entered the atmosphere in January 1958.",
        },
    ),
    (
        "ISS",
        InfoRecord {
            title: "International Space Station",
            date: "First module launched 20 November 1998",
            description: "A modular space station in low Earth orbit operated jointly by five \
                space agencies. Continuously crewed since November 2000, it serves as a \
                microgravity research laboratory.",
        },
    ),
    (
        "Hubble",
        InfoRecord {
            title: "Hubble Space Telescope",
            date: "Launched 24 April 1990",
            description: "A space telescope with a 2.4 m mirror observing in the ultraviolet, \
                visible and near-infrared. Five servicing missions kept it operational for \
                more than three decades.",
        },
    ),
    (
        "Voyager",
        InfoRecord {
            title: "Voyager 1",
            date: "Launched 5 September 1977",
            description: "A space probe that flew past Jupiter and Saturn and became the first \
                human-made object to enter interstellar space, in August 2012.",
        },
    ),
];

/// Entity name → record, fixed at build time and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct InfoTable {
    records: HashMap<&'static str, InfoRecord>,
}

impl InfoTable {
    /// The records for the satellites of the default catalog.
    pub fn satellites() -> Self {
        Self::from_entries(SATELLITES.iter().cloned())
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (&'static str, InfoRecord)>) -> Self {
        Self {
            records: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InfoRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
