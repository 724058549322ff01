//! Built-in reference catalogue of Cameroonian cities.
//!
//! Neighborhoods are grouped by arrondissement. Some names appear under two
//! arrondissements of the same city; only the first occurrence is stored.

use super::{ArrondissementSeed, CitySeed};

/// Every city seeded by `seed_reference_data`.
pub const REFERENCE_CATALOGUE: &[CitySeed] = &[YAOUNDE, DOUALA];

pub const YAOUNDE: CitySeed = CitySeed {
    name: "Yaoundé",
    region: "Centre",
    population: 2_800_000,
    arrondissements: &[
        ArrondissementSeed {
            name: "Yaoundé I",
            neighborhoods: &[
                "Briqueterie",
                "Mvog-Betsi",
                "Élig-Edzoa",
                "Étoudi",
                "Nkongmondo",
                "Mvolyé",
                "Mimboman",
                "Nkol-Ebogo",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé II",
            neighborhoods: &[
                "Mvog-Mbi",
                "Messa",
                "Carrière",
                "Mendong",
                "Nkolbisson",
                "Éfoulan",
                "Nkol-Eton",
                "Nkolmesseng",
                "Nkoabang",
                "Nkolbikok",
                "Melen",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé III",
            neighborhoods: &[
                "Biyem-Assi",
                "Cité Verte",
                "Nlongkak",
                "Mvan",
                "Nkolmengong",
                "Mfandena",
                "Tsinga",
                "Obili",
                "Nkolndongo",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé IV",
            neighborhoods: &[
                "Essos",
                "Nkolndongo",
                "Djoungolo",
                "Tsinga",
                "Quartier Fouda",
                "Nkol-Ewo",
                "Mokolo",
                "Mvog-Ada",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé V",
            neighborhoods: &[
                "Plateau",
                "Quartier du Lac",
                "Ahala",
                "Nkomkana",
                "Ekié",
                "Mballa II",
                "Mfoudi",
                "Bastos",
                "Hippodrome",
                "Ngoa-Ekellé",
                "Camp SIC",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé VI",
            neighborhoods: &[
                "Simbock",
                "Olembé",
                "Ekounou",
                "Emombo",
                "Mbankomo",
                "Ntougou",
                "Nkolmeyang",
                "Minkoameyos",
            ],
        },
        ArrondissementSeed {
            name: "Yaoundé VII",
            neighborhoods: &[
                "Nkolbisson",
                "Nkolmengong",
                "Nkolbikok",
                "Nkolmeyang",
                "Awae",
                "Minkoameyos",
                "Nkol-Nguet",
            ],
        },
    ],
};

pub const DOUALA: CitySeed = CitySeed {
    name: "Douala",
    region: "Littoral",
    population: 3_500_000,
    arrondissements: &[
        ArrondissementSeed {
            name: "Douala I",
            neighborhoods: &[
                "Bonapriso",
                "Bépanda",
                "Bassa",
                "New-Bell",
                "Nkongmondo",
                "Ndogbong",
                "Bonnefoy",
                "Camp-Sic",
                "Marché Congo",
                "Marché Sandaga",
                "Cité Sotega",
                "Akwa",
            ],
        },
        ArrondissementSeed {
            name: "Douala II",
            neighborhoods: &[
                "Kotto",
                "Logpom",
                "Ndogbong",
                "Sable",
                "Bonamoussadi",
                "Nyalla",
                "Sardinerie",
                "Logbessou",
                "Logbessou Plateau",
                "Makepe",
            ],
        },
        ArrondissementSeed {
            name: "Douala III",
            neighborhoods: &[
                "Logbaba",
                "Bonaléa",
                "Mabanda",
                "Mboppi",
                "Bois des Singes",
                "Ndogpassi",
                "Ndogpassi III",
                "Village",
                "Deïdo",
            ],
        },
        ArrondissementSeed {
            name: "Douala IV",
            neighborhoods: &[
                "Bonassama",
                "Mambanda",
                "Moungué",
                "Mambang",
                "Mambanda Sud",
                "Koutaba",
                "Mambanda Village",
                "Mambanda Nord",
            ],
        },
        ArrondissementSeed {
            name: "Douala V",
            neighborhoods: &[
                "Kpwa",
                "Kpwa-Bonandog",
                "Bonabéri",
                "Bwassadi",
                "Makepe",
                "Missoké",
                "Bonandog",
                "Kpwa Village",
            ],
        },
        ArrondissementSeed {
            name: "Douala VI",
            neighborhoods: &[
                "Manoka",
                "Mouti",
                "Soumou",
                "Pété",
                "Cap-Cameroun",
                "Nguele",
                "Yoyo",
            ],
        },
        ArrondissementSeed {
            name: "Douala VII",
            neighborhoods: &[
                "Bassa",
                "Bonabéri",
                "Logbaba",
                "Bonapriso",
                "Deïdo",
                "Akwa Nord",
                "Akwa Sud",
                "Bali",
            ],
        },
    ],
};
