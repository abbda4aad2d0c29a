//! Built-in translation catalog and local-file discovery metadata.

use crate::model::version::{BibleVersion, Language, ScriptDirection, SourceTag};

fn version(
    id: &str,
    name: &str,
    abbreviation: &str,
    description: &str,
    language: Language,
    source: SourceTag,
) -> BibleVersion {
    BibleVersion {
        id: id.to_string(),
        name: name.to_string(),
        name_local: name.to_string(),
        abbreviation: abbreviation.to_string(),
        abbreviation_local: abbreviation.to_string(),
        description: description.to_string(),
        language,
        source,
    }
}

fn latin(id: &str, name: &str, name_local: &str) -> Language {
    Language::new(id, name, name_local, "Latin", ScriptDirection::Ltr)
}

/// Built-in translations covering the major languages.
pub fn builtin_versions() -> Vec<BibleVersion> {
    use SourceTag::{GithubStep, GithubUnfolding, Static};

    let english = Language::english;
    let spanish = || latin("es", "Spanish", "Español");
    let french = || latin("fr", "French", "Français");
    let german = || latin("de", "German", "Deutsch");
    let portuguese = || latin("pt", "Portuguese", "Português");
    let korean = || Language::new("ko", "Korean", "한국어", "Hangul", ScriptDirection::Ltr);
    let chinese = || Language::new("zh", "Chinese", "中文", "Han", ScriptDirection::Ltr);
    let arabic = || Language::new("ar", "Arabic", "العربية", "Arabic", ScriptDirection::Rtl);
    let russian = || Language::new("ru", "Russian", "Русский", "Cyrillic", ScriptDirection::Ltr);
    let italian = || latin("it", "Italian", "Italiano");
    let dutch = || latin("nl", "Dutch", "Nederlands");
    let polish = || latin("pl", "Polish", "Polski");
    let japanese = || Language::new("ja", "Japanese", "日本語", "Japanese", ScriptDirection::Ltr);

    vec![
        version("kjv", "King James Version", "KJV", "The classic English translation from 1611", english(), Static),
        version("niv", "New International Version", "NIV", "Contemporary English translation", english(), Static),
        version("esv", "English Standard Version", "ESV", "Literal yet readable English translation", english(), Static),
        version("nlt", "New Living Translation", "NLT", "Clear, contemporary English", english(), Static),
        version("nasb", "New American Standard Bible", "NASB", "Literal English translation", english(), Static),
        version("ult", "unfoldingWord Literal Text", "ULT", "Accurate, literal translation by unfoldingWord", english(), GithubUnfolding),
        version("ust", "unfoldingWord Simplified Text", "UST", "Clear, simplified translation by unfoldingWord", english(), GithubUnfolding),
        version("ulb", "unfoldingWord Literal Bible", "ULB", "Literal Bible translation by unfoldingWord", english(), GithubUnfolding),
        version("udb", "unfoldingWord Dynamic Bible", "UDB", "Dynamic Bible translation by unfoldingWord", english(), GithubUnfolding),
        version("step-kjv", "STEP Bible KJV", "STEP-KJV", "King James Version with STEP Bible enhanced features", english(), GithubStep),
        version(
            "step-hebrew",
            "STEP Bible Hebrew",
            "STEP-HEB",
            "Hebrew Bible with STEP Bible tools",
            Language::new("he", "Hebrew", "עברית", "Hebrew", ScriptDirection::Rtl),
            GithubStep,
        ),
        version(
            "step-greek",
            "STEP Bible Greek",
            "STEP-GRK",
            "Greek New Testament with STEP Bible tools",
            Language::new("el", "Greek", "Ελληνικά", "Greek", ScriptDirection::Ltr),
            GithubStep,
        ),
        version("rvr1960", "Reina-Valera 1960", "RVR1960", "Popular Spanish translation", spanish(), Static),
        version("nvi", "Nueva Versión Internacional", "NVI", "Contemporary Spanish translation", spanish(), Static),
        version("lbla", "La Biblia de las Américas", "LBLA", "Accurate Spanish translation", spanish(), Static),
        version("dhh", "Dios Habla Hoy", "DHH", "Contemporary Spanish version", spanish(), Static),
        version("lsg", "Louis Segond 1910", "LSG", "Classic French Protestant translation", french(), Static),
        version("bds", "Bible du Semeur", "BDS", "Contemporary French translation", french(), Static),
        version("nfc", "Nouvelle Français Courant", "NFC", "Modern French version", french(), Static),
        version("luther1912", "Luther Bibel 1912", "LUT", "Classic German Luther translation", german(), Static),
        version("luther2017", "Luther Bibel 2017", "LUT17", "Revised Luther translation", german(), Static),
        version("elb", "Elberfelder Bibel", "ELB", "Literal German translation", german(), Static),
        version("acf", "Almeida Corrigida Fiel", "ACF", "Traditional Portuguese translation", portuguese(), Static),
        version("nvi-pt", "Nova Versão Internacional", "NVI", "Contemporary Portuguese translation", portuguese(), Static),
        version("krv", "Korean Revised Version", "KRV", "Standard Korean translation", korean(), Static),
        version("nkrv", "New Korean Revised Version", "NKRV", "Modern Korean translation", korean(), Static),
        version("ccb", "Chinese Contemporary Bible", "CCB", "Contemporary Chinese translation", chinese(), Static),
        version("cunp", "Chinese Union Version", "CUNP", "Traditional Chinese union version", chinese(), Static),
        version("nav", "New Arabic Version", "NAV", "Contemporary Arabic translation", arabic(), Static),
        version("svd", "Smith and Van Dyke", "SVD", "Classic Arabic translation", arabic(), Static),
        version("rst", "Russian Synodal Translation", "RST", "Traditional Russian Orthodox translation", russian(), Static),
        version("cars", "Contemporary Russian Translation", "CARS", "Modern Russian translation", russian(), Static),
        version("cei", "Conferenza Episcopale Italiana", "CEI", "Official Catholic Italian translation", italian(), Static),
        version("nuovadiodati", "Nuova Diodati", "ND", "Protestant Italian translation", italian(), Static),
        version("hsv", "Herziene Statenvertaling", "HSV", "Revised Dutch States translation", dutch(), Static),
        version("nbv", "Nieuwe Bijbelvertaling", "NBV", "New Dutch Bible translation", dutch(), Static),
        version("bw", "Biblia Warszawska", "BW", "Warsaw Bible translation", polish(), Static),
        version("bt", "Biblia Tysiąclecia", "BT", "Millennium Bible", polish(), Static),
        version("jlb", "Japanese Living Bible", "JLB", "Contemporary Japanese paraphrase", japanese(), Static),
        version("jkv", "Japanese Kougo-yaku", "JKV", "Japanese colloquial translation", japanese(), Static),
        version(
            "hindi",
            "Hindi Bible",
            "HIN",
            "Hindi translation",
            Language::new("hi", "Hindi", "हिन्दी", "Devanagari", ScriptDirection::Ltr),
            Static,
        ),
        version("swahili", "Biblia Takatifu", "BT-SW", "Swahili Holy Bible", latin("sw", "Swahili", "Kiswahili"), Static),
        version("no78", "Bibelen 1978", "NO78", "Norwegian Bible 1978", latin("no", "Norwegian", "Norsk"), Static),
        version("sv1917", "Svenska Bibeln 1917", "SV1917", "Swedish Bible 1917", latin("sv", "Swedish", "Svenska"), Static),
    ]
}

/// Translation files probed during discovery: `(id, name, language id)`.
const DISCOVERY_NAMES: &[(&str, &str, &str)] = &[
    ("amp", "Amplified Bible", "en"),
    ("ampc", "Amplified Bible Classic", "en"),
    ("asv", "American Standard Version", "en"),
    ("bsb", "Berean Study Bible", "en"),
    ("ceb", "Common English Bible", "en"),
    ("cev", "Contemporary English Version", "en"),
    ("cevdci", "CEV Deuterocanonicals", "en"),
    ("cevuk", "CEV UK", "en"),
    ("cjb", "Complete Jewish Bible", "en"),
    ("cpdv", "Catholic Public Domain Version", "en"),
    ("csb", "Christian Standard Bible", "en"),
    ("darby", "Darby Translation", "en"),
    ("drc1752", "Douay-Rheims 1752", "en"),
    ("easy", "Easy-to-Read Version", "en"),
    ("erv", "English Revised Version", "en"),
    ("esv", "English Standard Version", "en"),
    ("fbv", "Free Bible Version", "en"),
    ("fnvnt", "First Nations Version NT", "en"),
    ("gnbdc", "Good News Bible DC", "en"),
    ("gnbdk", "Good News Bible DK", "en"),
    ("gnbuk", "Good News Bible UK", "en"),
    ("gnt", "Good News Translation", "en"),
    ("gntd", "Good News Translation Deuterocanonicals", "en"),
    ("gnv", "Geneva Bible", "en"),
    ("gw", "God's Word Translation", "en"),
    ("gwc", "God's Word Catholic", "en"),
    ("hcsb", "Holman Christian Standard Bible", "en"),
    ("icb", "International Children's Bible", "en"),
    ("icl00d", "Interconfessional Lectionary", "en"),
    ("jub", "Jubilee Bible 2000", "en"),
    ("kjv", "King James Version", "en"),
    ("kjvaae", "KJV American Anglicized Edition", "en"),
    ("kjvae", "KJV Anglicized Edition", "en"),
    ("leb", "Lexham English Bible", "en"),
    ("lsb", "Legacy Standard Bible", "en"),
    ("mev", "Modern English Version", "en"),
    ("mp1650", "Matthew Parker Bible 1650", "en"),
    ("mp1781", "Matthew Parker Bible 1781", "en"),
    ("msg", "The Message", "en"),
    ("nabre", "New American Bible Revised Edition", "en"),
    ("nasb1995", "New American Standard Bible 1995", "en"),
    ("nasb2020", "New American Standard Bible 2020", "en"),
    ("ncv", "New Century Version", "en"),
    ("net", "New English Translation", "en"),
    ("nirv", "New International Reader's Version", "en"),
    ("niv", "New International Version", "en"),
    ("nivuk", "New International Version UK", "en"),
    ("nkjv", "New King James Version", "en"),
    ("nlt", "New Living Translation", "en"),
    ("nmv", "New Millennium Version", "en"),
    ("nr06", "Nuova Riveduta 2006", "it"),
    ("nrsv", "New Revised Standard Version", "en"),
    ("nrsvue", "NRSV Updated Edition", "en"),
    ("pev", "Plain English Version", "en"),
    ("rad", "Radak Commentary", "en"),
    ("rsv", "Revised Standard Version", "en"),
    ("rsvci", "RSV Catholic Interconfessional", "en"),
    ("rv1885", "Revised Version 1885", "en"),
    ("rv1895", "Revised Version 1895", "en"),
    ("tcent", "Twentieth Century New Testament", "en"),
    ("teg", "The English Gospel", "en"),
    ("tlv", "Tree of Life Version", "en"),
    ("tojb2011", "Tree of Life Bible 2011", "en"),
    ("tpt", "The Passion Translation", "en"),
    ("ts2009", "The Scriptures 2009", "en"),
    ("vulg", "Vulgate", "la"),
    ("wbms", "Webster Bible", "en"),
    ("webbe", "World English Bible British Edition", "en"),
    ("webus", "World English Bible US Edition", "en"),
    ("wmb", "World Messianic Bible", "en"),
    ("wmbbe", "World Messianic Bible British Edition", "en"),
    ("ylt98", "Young's Literal Translation 1898", "en"),
];

/// Default translation ids probed when no manifest is available.
pub fn default_probe_ids() -> Vec<String> {
    DISCOVERY_NAMES
        .iter()
        .map(|(id, _, _)| (*id).to_string())
        .collect()
}

/// Builds a `local-json` version for a probed translation file.
///
/// Unknown ids use their upper-cased form as name and English as language.
pub fn discovered_version(id: &str) -> BibleVersion {
    let lowered = id.to_lowercase();
    let (name, language_id) = DISCOVERY_NAMES
        .iter()
        .find(|(known, _, _)| *known == lowered)
        .map(|(_, name, language)| ((*name).to_string(), *language))
        .unwrap_or_else(|| (id.to_uppercase(), "en"));

    let language = match language_id {
        "it" => latin("it", "Italian", "Italian"),
        "la" => latin("la", "Latin", "Latin"),
        _ => Language::english(),
    };

    BibleVersion {
        id: id.to_string(),
        name: name.clone(),
        name_local: name.clone(),
        abbreviation: id.to_uppercase(),
        abbreviation_local: id.to_uppercase(),
        description: format!("{name} - Scripture from local data"),
        language,
        source: SourceTag::LocalJson,
    }
}

/// STEP Bible version code for a `github-step` translation id.
pub fn step_version_code(version_id: &str) -> &'static str {
    match version_id {
        "step-kjv" => "KJV",
        "step-esv" => "ESV",
        "step-niv" => "NIV",
        "step-nasb" => "NASB",
        "step-hebrew" => "OSMHB",
        "step-greek" => "SBLGNT",
        _ => "ESV",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_are_unique() {
        let versions = builtin_versions();
        let ids: HashSet<_> = versions.iter().map(|version| version.id.as_str()).collect();
        assert_eq!(ids.len(), versions.len());
        assert!(versions.len() >= 40);
    }

    #[test]
    fn rtl_languages_are_marked() {
        let versions = builtin_versions();
        let arabic = versions.iter().find(|version| version.id == "svd").unwrap();
        assert_eq!(arabic.language.script_direction, ScriptDirection::Rtl);
        let hebrew = versions
            .iter()
            .find(|version| version.id == "step-hebrew")
            .unwrap();
        assert_eq!(hebrew.language.script_direction, ScriptDirection::Rtl);
    }

    #[test]
    fn discovered_version_uses_known_names() {
        let vulgate = discovered_version("vulg");
        assert_eq!(vulgate.name, "Vulgate");
        assert_eq!(vulgate.language.id, "la");
        assert_eq!(vulgate.source, SourceTag::LocalJson);

        let unknown = discovered_version("xyz");
        assert_eq!(unknown.name, "XYZ");
        assert_eq!(unknown.language.id, "en");
    }

    #[test]
    fn step_codes_default_to_esv() {
        assert_eq!(step_version_code("step-hebrew"), "OSMHB");
        assert_eq!(step_version_code("step-unknown"), "ESV");
    }
}
