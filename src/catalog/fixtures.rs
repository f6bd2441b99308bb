// Test catalog shared by the resolver, formatter and db tests

use crate::catalog::memory::MemoryCatalog;
use crate::catalog::records::{
    AgentRecord, CatalogRecord, ContainerRecord, KnifeSkin, Side, SkinRecord, StickerRecord,
    StickerType, ToolRecord,
};
use crate::names::{Quality, QualitySet};

fn qualities(codes: &str) -> QualitySet {
    QualitySet::parse_codes(codes).unwrap()
}

fn patterned(name: &str) -> KnifeSkin {
    KnifeSkin::Patterned {
        pattern_name: name.to_string(),
    }
}

pub fn fixture_records() -> Vec<CatalogRecord> {
    let skins = vec![
        SkinRecord::gun("AK-47 | Redline", "Redline", qualities("mw,ft,ww,bs")).with_stattrak(),
        SkinRecord::gun("AK-47 | Asiimov", "Asiimov", qualities("ft,ww,bs")).with_stattrak(),
        SkinRecord::gun("AK-47 | Safari Mesh", "Safari Mesh", QualitySet::all()).with_souvenir(),
        SkinRecord::gun("AWP | Dragon Lore", "Dragon Lore", QualitySet::all()).with_souvenir(),
        SkinRecord::gun("M4A4 | Howl", "Howl", qualities("fn,mw,ft,ww")).with_stattrak(),
        SkinRecord::gun("Desert Eagle | Blaze", "Blaze", qualities("fn,mw")),
        SkinRecord::glove("Sport Gloves | Pandora's Box", "Pandora's Box", QualitySet::all()),
        SkinRecord::glove(
            "Specialist Gloves | Crimson Kimono",
            "Crimson Kimono",
            qualities("mw,ft,ww,bs"),
        ),
        SkinRecord::knife("Karambit", KnifeSkin::Vanilla, QualitySet::empty()).with_stattrak(),
        SkinRecord::knife("Karambit | Fade", patterned("Fade"), qualities("fn,mw")).with_stattrak(),
        SkinRecord::knife("Karambit | Doppler", patterned("Doppler"), qualities("fn,mw"))
            .with_stattrak(),
        SkinRecord::knife("M9 Bayonet", KnifeSkin::Vanilla, QualitySet::empty()).with_stattrak(),
        SkinRecord::knife("M9 Bayonet | Fade", patterned("Fade"), qualities("fn,mw"))
            .with_stattrak(),
        SkinRecord::knife(
            "M9 Bayonet | Marble Fade",
            patterned("Marble Fade"),
            qualities("fn,mw"),
        )
        .with_stattrak(),
        SkinRecord::knife(
            "Bayonet",
            KnifeSkin::Vanilla,
            [Quality::FactoryNew, Quality::MinimalWear, Quality::FieldTested]
                .into_iter()
                .collect(),
        ),
        SkinRecord::knife(
            "Navaja Knife | Safari Mesh",
            patterned("Safari Mesh"),
            QualitySet::all(),
        )
        .with_stattrak(),
    ];

    let containers = [
        "Chroma 2 Case",
        "Operation Breakout Weapon Case",
        "Katowice 2014 Legends (Holo/Foil)",
        "Recoil Case",
    ];

    let agents = [
        (Side::Ct, "Lt. Commander Ricksaw | NSWC SEAL"),
        (Side::Ct, "Seal Team 6 Soldier | NSWC SEAL"),
        (Side::Ct, "Cmdr. Mae 'Dead Cold' Jamison | SWAT"),
        (Side::T, "The Elite Mr. Muhlik | Elite Crew"),
        (Side::T, "Sir Bloody Darryl The Strapped | The Professionals"),
    ];

    let stickers = [
        (StickerType::Tournament, "Titan (Holo) | Katowice 2014"),
        (StickerType::Tournament, "iBUYPOWER (Holo) | Katowice 2014"),
        (StickerType::Regular, "Howling Dawn"),
        (StickerType::Regular, "Adrenaline Rush"),
        (StickerType::Patch, "Patch | Howl"),
        (StickerType::Patch, "Patch | Phoenix"),
        (StickerType::Charm, "Charm | Lil' Howl"),
    ];

    let tools = ["Name Tag", "StatTrak™ Swap Tool", "Sticker Remover"];

    let mut records: Vec<CatalogRecord> = skins.into_iter().map(CatalogRecord::Skin).collect();
    records.extend(containers.iter().map(|name| {
        CatalogRecord::Container(ContainerRecord {
            name: name.to_string(),
        })
    }));
    records.extend(agents.iter().map(|(side, name)| {
        CatalogRecord::Agent(AgentRecord {
            side: *side,
            name: name.to_string(),
        })
    }));
    records.extend(stickers.iter().map(|(sticker_type, full_name)| {
        CatalogRecord::Sticker(StickerRecord {
            sticker_type: *sticker_type,
            full_name: full_name.to_string(),
        })
    }));
    records.extend(tools.iter().map(|name| {
        CatalogRecord::Tool(ToolRecord {
            name: name.to_string(),
        })
    }));
    records
}

pub fn fixture_catalog() -> MemoryCatalog {
    MemoryCatalog::from_records(fixture_records())
}
