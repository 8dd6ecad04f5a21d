//! Device classification from MAC address and vendor string.
//!
//! Probe requests carry no explicit device type, so the type is inferred
//! from the vendor (keyword match, first hit wins) plus a randomized-MAC
//! heuristic: modern phones randomize their probe MACs, so a randomized MAC
//! with no recognizable vendor is almost always a smartphone.

/// Keyword (lowercase) found in the vendor string → (device_type, brand).
/// Order matters: the first match wins.
const VENDOR_KEYWORDS: &[(&str, &str, Option<&str>)] = &[
    // Smartphones
    ("apple", "smartphone", Some("apple")),
    ("samsung electronics", "smartphone", Some("samsung")),
    ("samsung electro-mechanics", "smartphone", Some("samsung")),
    ("xiaomi", "smartphone", Some("xiaomi")),
    ("huawei", "smartphone", Some("huawei")),
    ("honor device", "smartphone", Some("honor")),
    ("honor", "smartphone", Some("honor")),
    ("google", "smartphone", Some("google")),
    ("oneplus", "smartphone", Some("oneplus")),
    ("oppo", "smartphone", Some("oppo")),
    ("realme", "smartphone", Some("realme")),
    ("vivo mobile", "smartphone", Some("vivo")),
    ("vivo", "smartphone", Some("vivo")),
    ("motorola", "smartphone", Some("motorola")),
    ("lenovo", "smartphone", Some("lenovo")),
    ("sony mobile", "smartphone", Some("sony")),
    ("sony", "smartphone", Some("sony")),
    ("lg electronics", "smartphone", Some("lg")),
    ("lg innotek", "smartphone", Some("lg")),
    ("zte", "smartphone", Some("zte")),
    ("meizu", "smartphone", Some("meizu")),
    ("nokia", "smartphone", Some("nokia")),
    ("hmd global", "smartphone", Some("nokia")),
    ("asus", "smartphone", Some("asus")),
    ("tcl", "smartphone", Some("tcl")),
    ("nothing technology", "smartphone", Some("nothing")),
    // Tablets
    ("amazon", "tablet", Some("amazon")),
    // Laptops (OEM Wi-Fi chip makers, seen almost exclusively in laptops)
    ("intel corporate", "laptop", None),
    ("intel", "laptop", None),
    ("azurewave", "laptop", None),
    ("liteon", "laptop", None),
    ("rivet networks", "laptop", None),
    ("qualcomm", "laptop", None),
    ("mediatek", "laptop", None),
    ("dell", "laptop", Some("dell")),
    ("hewlett packard", "laptop", Some("hp")),
    ("hp inc", "laptop", Some("hp")),
    ("microsoft", "laptop", Some("microsoft")),
    ("cloud network technology", "laptop", None),
    ("hon hai", "laptop", None),
    ("foxconn", "laptop", None),
    ("wistron", "laptop", None),
    ("compal", "laptop", None),
    ("quanta", "laptop", None),
    ("pegatron", "laptop", None),
    ("fibocom", "laptop", None),
    // Watches / trackers
    ("fitbit", "smartwatch", Some("fitbit")),
    ("garmin", "smartwatch", Some("garmin")),
    // IoT / cameras / network gear
    ("espressif", "iot", None),
    ("raspberry pi", "iot", None),
    ("hikvision", "iot", None),
    ("dahua", "iot", None),
    ("tuya", "iot", None),
    ("tp-link", "iot", None),
    ("ubiquiti", "iot", None),
];

/// Long legal vendor names → short display names.
const SHORT_NAMES: &[(&str, &str)] = &[
    ("apple", "Apple"),
    ("samsung electro-mechanics", "Samsung"),
    ("samsung electronics", "Samsung"),
    ("beijing xiaomi", "Xiaomi"),
    ("xiaomi", "Xiaomi"),
    ("huawei", "Huawei"),
    ("honor device", "Honor"),
    ("google", "Google"),
    ("oneplus", "OnePlus"),
    ("oppo", "OPPO"),
    ("realme", "Realme"),
    ("vivo mobile", "Vivo"),
    ("vivo", "Vivo"),
    ("motorola", "Motorola"),
    ("lenovo", "Lenovo"),
    ("sony", "Sony"),
    ("lg electronics", "LG"),
    ("lg innotek", "LG"),
    ("zte", "ZTE"),
    ("meizu", "Meizu"),
    ("hmd global", "Nokia"),
    ("nokia", "Nokia"),
    ("asus", "ASUS"),
    ("tcl", "TCL"),
    ("nothing technology", "Nothing"),
    ("intel corporate", "Intel"),
    ("intel", "Intel"),
    ("azurewave", "AzureWave"),
    ("liteon", "Liteon"),
    ("qualcomm", "Qualcomm"),
    ("mediatek", "MediaTek"),
    ("dell", "Dell"),
    ("hewlett packard", "HP"),
    ("hp inc", "HP"),
    ("microsoft", "Microsoft"),
    ("cloud network technology", "Foxconn"),
    ("hon hai", "Foxconn"),
    ("foxconn", "Foxconn"),
    ("fibocom", "Fibocom"),
    ("amazon", "Amazon"),
    ("fitbit", "Fitbit"),
    ("garmin", "Garmin"),
    ("espressif", "Espressif"),
    ("raspberry pi", "Raspberry Pi"),
    ("hikvision", "Hikvision"),
    ("dahua", "Dahua"),
    ("tp-link", "TP-Link"),
    ("ubiquiti", "Ubiquiti"),
];

const LEGAL_SUFFIXES: &[&str] = &[
    " Co.,Ltd",
    " Co., Ltd.",
    " Inc.",
    " Corp.",
    " Corporation",
    " PTE. LTD.",
    " Pte. Ltd.",
    " Ltd.",
    " Ltd",
    " LLC",
    " GmbH",
    " AG",
    " S.A.",
    " Limited",
];

/// Result of classifying one sighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub mac: String,
    pub is_random: bool,
    pub vendor: Option<String>,
    pub device_type: String,
    pub device_brand: Option<String>,
}

/// Normalize a MAC to lowercase colon-separated form. Accepts `:`, `-` and
/// `.` separators or none at all; anything that is not 12 hex digits after
/// stripping yields `None`.
pub fn normalize_mac(mac: &str) -> Option<String> {
    let clean: String = mac
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect::<String>()
        .to_ascii_lowercase();

    if clean.len() != 12 || !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let pairs: Vec<&str> = (0..6).map(|i| &clean[i * 2..i * 2 + 2]).collect();
    Some(pairs.join(":"))
}

/// Whether a MAC is locally administered (randomized). The scanner's own
/// flag wins when present; otherwise the LAA bit of the first octet decides.
pub fn is_randomized(mac: &str, scanner_flag: Option<bool>) -> bool {
    if let Some(flag) = scanner_flag {
        return flag;
    }

    let Some(normalized) = normalize_mac(mac) else {
        return false;
    };
    match u8::from_str_radix(&normalized[..2], 16) {
        Ok(first_octet) => first_octet & 0x02 != 0,
        Err(_) => false,
    }
}

fn classify_by_vendor(vendor_raw: &str) -> (&'static str, Option<&'static str>) {
    let vendor_lower = vendor_raw.to_lowercase();
    for (keyword, device_type, brand) in VENDOR_KEYWORDS {
        if vendor_lower.contains(keyword) {
            return (device_type, *brand);
        }
    }
    ("other", None)
}

/// Shorten a long legal vendor name for display:
/// `"Samsung Electronics Co.,Ltd"` → `"Samsung"`. Falls back to trimming a
/// known legal suffix.
pub fn short_vendor_name(vendor_raw: &str) -> String {
    let vendor_lower = vendor_raw.to_lowercase();
    for (key, short) in SHORT_NAMES {
        if vendor_lower.contains(key) {
            return (*short).to_owned();
        }
    }

    let name = vendor_raw.split_whitespace().collect::<Vec<_>>().join(" ");
    for suffix in LEGAL_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped.trim().to_owned();
        }
    }
    name.trim().to_owned()
}

/// Classify one sighting from its MAC, optional scanner vendor string and
/// optional scanner randomization flag.
///
/// Laptop-OEM vendors (Intel, AzureWave, Foxconn, ...) only yield `laptop`
/// for a real MAC; a randomized MAC carrying a chipmaker OUI is `other`.
/// A randomized MAC with no vendor at all is assumed to be a smartphone.
pub fn classify(mac: &str, vendor_raw: Option<&str>, scanner_flag: Option<bool>) -> Classification {
    let Some(normalized) = normalize_mac(mac) else {
        return Classification {
            mac: mac.to_owned(),
            is_random: false,
            vendor: None,
            device_type: "other".to_owned(),
            device_brand: None,
        };
    };

    let is_random = is_randomized(&normalized, scanner_flag);

    let mut device_type = "other";
    let mut device_brand = None;
    if let Some(vendor) = vendor_raw {
        let (t, b) = classify_by_vendor(vendor);
        device_type = t;
        device_brand = b;
        if device_type == "laptop" && is_random {
            device_type = "other";
            device_brand = None;
        }
    } else if is_random {
        device_type = "smartphone";
    }

    Classification {
        mac: normalized,
        is_random,
        vendor: vendor_raw.map(short_vendor_name),
        device_type: device_type.to_owned(),
        device_brand: device_brand.map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_normalization_accepts_common_separators() {
        assert_eq!(
            normalize_mac("AA:BB:CC:DD:EE:FF").as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(
            normalize_mac("aa-bb-cc-dd-ee-ff").as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(
            normalize_mac("aabb.ccdd.eeff").as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(normalize_mac("aa:bb:cc"), None);
        assert_eq!(normalize_mac("zz:bb:cc:dd:ee:ff"), None);
        assert_eq!(normalize_mac(""), None);
    }

    #[test]
    fn laa_bit_detects_randomized_macs() {
        assert!(is_randomized("02:00:00:aa:bb:cc", None));
        assert!(is_randomized("aa:bb:cc:dd:ee:ff", None)); // 0xaa has the LAA bit
        assert!(!is_randomized("00:1a:2b:3c:4d:5e", None));
    }

    #[test]
    fn scanner_flag_overrides_laa_bit() {
        assert!(!is_randomized("02:00:00:aa:bb:cc", Some(false)));
        assert!(is_randomized("00:1a:2b:3c:4d:5e", Some(true)));
    }

    #[test]
    fn random_mac_without_vendor_is_a_smartphone() {
        let c = classify("02:00:00:aa:bb:cc", None, None);
        assert_eq!(c.device_type, "smartphone");
        assert!(c.is_random);
    }

    #[test]
    fn real_mac_without_vendor_is_other() {
        let c = classify("00:1a:2b:3c:4d:5e", None, Some(false));
        assert_eq!(c.device_type, "other");
        assert!(!c.is_random);
    }

    #[test]
    fn vendor_keywords_map_type_and_brand() {
        let c = classify("00:1a:2b:3c:4d:5e", Some("Apple, Inc."), Some(false));
        assert_eq!(c.device_type, "smartphone");
        assert_eq!(c.device_brand.as_deref(), Some("apple"));
        assert_eq!(c.vendor.as_deref(), Some("Apple"));
    }

    #[test]
    fn randomized_mac_with_laptop_oem_vendor_is_other() {
        let c = classify("02:00:00:aa:bb:cc", Some("Intel Corporate"), None);
        assert_eq!(c.device_type, "other");
        assert_eq!(c.device_brand, None);

        let c = classify("00:1a:2b:3c:4d:5e", Some("Intel Corporate"), Some(false));
        assert_eq!(c.device_type, "laptop");
    }

    #[test]
    fn short_vendor_names() {
        assert_eq!(short_vendor_name("Samsung Electronics Co.,Ltd"), "Samsung");
        assert_eq!(
            short_vendor_name("CLOUD NETWORK TECHNOLOGY SINGAPORE PTE. LTD."),
            "Foxconn"
        );
        assert_eq!(short_vendor_name("Shelly Europe Ltd."), "Shelly Europe");
    }

    #[test]
    fn invalid_mac_falls_back_to_other() {
        let c = classify("not-a-mac", None, None);
        assert_eq!(c.device_type, "other");
        assert_eq!(c.mac, "not-a-mac");
        assert!(!c.is_random);
    }
}
