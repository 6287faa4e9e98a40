//! Link-detection patterns.
//!
//! Three detectors in precedence order: email, phone, URL. Each carries
//! the scheme prefix its links get and an optional exclusion pattern that
//! vetoes a match.

use std::sync::LazyLock;

use regex::Regex;

/// Non-ASCII letter blocks accepted in email local parts and domains
const UNICODE_EMAIL_CHARS: &[&str] = &[
    "\\x{0080}-\\x{00FF}\\x{0100}-\\x{017F}\\x{0180}-\\x{024F}\\x{0250}-\\x{02AF}\\x{0300}-\\x{036F}",
    "\\x{0370}-\\x{03FF}\\x{0400}-\\x{04FF}\\x{0500}-\\x{052F}\\x{0530}-\\x{058F}\\x{0590}-\\x{05FF}",
    "\\x{0600}-\\x{06FF}\\x{0700}-\\x{074F}\\x{0750}-\\x{077F}\\x{0780}-\\x{07BF}\\x{07C0}-\\x{07FF}",
    "\\x{0900}-\\x{097F}\\x{0980}-\\x{09FF}\\x{0A00}-\\x{0A7F}\\x{0A80}-\\x{0AFF}\\x{0B00}-\\x{0B7F}",
    "\\x{0B80}-\\x{0BFF}\\x{0C00}-\\x{0C7F}\\x{0C80}-\\x{0CFF}\\x{0D00}-\\x{0D7F}\\x{0D80}-\\x{0DFF}",
    "\\x{0E00}-\\x{0E7F}\\x{0E80}-\\x{0EFF}\\x{0F00}-\\x{0FFF}\\x{1000}-\\x{109F}\\x{10A0}-\\x{10FF}",
    "\\x{1100}-\\x{11FF}\\x{1200}-\\x{137F}\\x{1380}-\\x{139F}\\x{13A0}-\\x{13FF}\\x{1400}-\\x{167F}",
    "\\x{1680}-\\x{169F}\\x{16A0}-\\x{16FF}\\x{1700}-\\x{171F}\\x{1720}-\\x{173F}\\x{1740}-\\x{175F}",
    "\\x{1760}-\\x{177F}\\x{1780}-\\x{17FF}\\x{1800}-\\x{18AF}\\x{1900}-\\x{194F}\\x{1950}-\\x{197F}",
    "\\x{1980}-\\x{19DF}\\x{19E0}-\\x{19FF}\\x{1A00}-\\x{1A1F}\\x{1B00}-\\x{1B7F}\\x{1D00}-\\x{1D7F}",
    "\\x{1D80}-\\x{1DBF}\\x{1DC0}-\\x{1DFF}\\x{1E00}-\\x{1EFF}\\x{1F00}-\\x{1FFF}\\x{20D0}-\\x{20FF}",
    "\\x{2100}-\\x{214F}\\x{2C00}-\\x{2C5F}\\x{2C60}-\\x{2C7F}\\x{2C80}-\\x{2CFF}\\x{2D00}-\\x{2D2F}",
    "\\x{2D30}-\\x{2D7F}\\x{2D80}-\\x{2DDF}\\x{2F00}-\\x{2FDF}\\x{2FF0}-\\x{2FFF}\\x{3040}-\\x{309F}",
    "\\x{30A0}-\\x{30FF}\\x{3100}-\\x{312F}\\x{3130}-\\x{318F}\\x{3190}-\\x{319F}\\x{31C0}-\\x{31EF}",
    "\\x{31F0}-\\x{31FF}\\x{3200}-\\x{32FF}\\x{3300}-\\x{33FF}\\x{3400}-\\x{4DBF}\\x{4DC0}-\\x{4DFF}",
    "\\x{4E00}-\\x{9FFF}\\x{A000}-\\x{A48F}\\x{A490}-\\x{A4CF}\\x{A700}-\\x{A71F}\\x{A800}-\\x{A82F}",
    "\\x{A840}-\\x{A87F}\\x{AC00}-\\x{D7AF}\\x{F900}-\\x{FAFF}",
];

const COMMON_TLDS: &[&str] = &[
    "com", "org", "edu", "gov", "uk", "net", "ca", "de", "jp", "fr", "au", "us", "ru", "ch", "it",
    "nl", "se", "no", "es", "mil", "ly",
];

pub static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let unicode = UNICODE_EMAIL_CHARS.concat();
    let pattern = format!(
        r"([a-z.A-Z{unicode}0-9!#$%&'*+\-/=?^_`{{|}}~]+@[A-Za-z{unicode}0-9.\-]+\.[A-Za-z]{{2,63}})"
    );
    Regex::new(&pattern).expect("EMAIL_RE: hardcoded regex is valid")
});

/// Email-shaped text that is really part of a path or query string
pub static EMAIL_EXCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\..*[/|?].*@").expect("EMAIL_EXCLUDE_RE: hardcoded regex is valid")
});

pub static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([+(]+|\b)(?:([0-9]{1,3}[- ()]*)?)([0-9]{3})[- )]+([0-9]{3})[- ]+([0-9]{4})(?: *x([0-9]+))?\b",
    )
    .expect("PHONE_RE: hardcoded regex is valid")
});

pub static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let word = "0-9A-Za-z_";
    let scheme = r"([A-Za-z]{3,9}://)";
    let userinfo = format!(r"(?:[\-;:&=+$,{word}]+@)?");
    let label = r"[a-zA-Z0-9_\-]";
    let ip = r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}";
    let tlds = COMMON_TLDS.join("|");

    // any TLD when a scheme is present
    let with_scheme =
        format!(r"({scheme}{userinfo}(({label}+\.)*[a-zA-Z0-9]{label}+\.[a-zA-Z]{{2,11}}|{ip})");
    // only common TLDs without a scheme, and only at the end of the text
    let without_scheme =
        format!(r"{scheme}?{userinfo}(({label}+\.)*[a-zA-Z0-9]{label}+\.(?:{tlds})$|{ip}))");
    let mailto = format!(r"mailto:/*(?:[{word}]+\.|[\-;:&=+$.,{word}]+@)[A-Za-z0-9.\-]+");
    // path, then query and fragment; the last character is never punctuation
    let path = format!(r"(?:[+=~%/.{word}\-@]*[+~%/{word}\-:]+)?");
    let query = format!(
        r"(?:(\?[\-+=&;%@.{word}#]*[#\-+=&;%@{word}/]+)?#?(?:['$&()*+,;=.!/\\{word}%-?]*[/\\{word}@$.&=]+)?)?"
    );

    let pattern =
        format!(r"(?i)(({with_scheme}|{without_scheme}(?::[0-9]*)?|{mailto})({path}{query})?)");
    Regex::new(&pattern).expect("URL_RE: hardcoded regex is valid")
});
