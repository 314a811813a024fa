//! Word lists for the heuristic parser

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tokens that keep their trailing dot
pub const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "St.", "Gen.", "Gov.", "Sen.", "Rep.",
    "Lt.", "Col.", "Capt.", "Inc.", "Corp.", "Ltd.", "Co.", "Bros.", "Mt.", "Ave.", "vs.",
    "etc.", "e.g.", "i.e.", "Jan.", "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.",
    "Sept.", "Oct.", "Nov.", "Dec.", "No.", "U.S.", "U.K.", "U.N.", "E.U.", "a.m.", "p.m.",
];

/// Titles that introduce a person's name
pub const HONORIFICS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sir", "Dame", "Lady", "Lord", "Mr", "Mrs", "Ms", "Dr",
    "President", "Senator", "Sen.", "Governor", "Gov.", "Mayor", "Judge", "Justice", "General",
    "Gen.", "Captain", "Capt.", "Rep.", "Representative", "Chancellor", "Minister", "Queen",
    "King", "Prince", "Princess", "Pope", "Rev.", "Father", "Sister",
];

pub const FIRST_NAMES: &[&str] = &[
    "Tim", "Satya", "Sundar", "Elon", "Jeff", "Mark", "Bill", "Steve", "Larry", "Sergey",
    "Jensen", "Lisa", "Susan", "Sheryl", "Marissa", "Jack", "Warren", "Sam", "Andy", "Reed",
    "John", "James", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Sarah",
    "Karen", "Nancy", "Emma", "Olivia", "Sophia", "Anna", "Maria", "Peter", "Paul", "George",
    "Donald", "Joe", "Barack", "Angela", "Emmanuel", "Justin", "Boris", "Vladimir", "Xi",
    "Narendra", "Kamala", "Hillary", "Alice", "Bob", "Carol", "Daniel", "Laura", "Kevin",
    "Brian", "Emily", "Jessica", "Matthew", "Chris", "Christopher", "Jane", "Tom", "Ben",
];

/// Known organization names (exact case)
pub const ORGANIZATIONS: &[&str] = &[
    "Apple", "Microsoft", "Google", "Alphabet", "Amazon", "Meta", "Facebook", "Netflix",
    "Tesla", "SpaceX", "Nvidia", "NVIDIA", "Intel", "AMD", "IBM", "Oracle", "Samsung", "Sony",
    "Twitter", "OpenAI", "Anthropic", "Uber", "Airbnb", "Adobe", "Salesforce", "Cisco",
    "Toyota", "Ford", "Boeing", "Airbus", "Walmart", "Disney", "Pfizer", "Moderna",
    "Goldman Sachs", "JPMorgan", "Morgan Stanley", "NASA", "FBI", "CIA", "UN", "NATO", "WHO",
    "EU", "Harvard", "Stanford", "MIT", "Reuters", "Bloomberg", "BBC", "CNN",
    "New York Times", "Wall Street Journal", "Congress", "Parliament", "Senate",
];

/// Words that make a capitalized run an organization when they end it
pub const ORG_SUFFIXES: &[&str] = &[
    "Inc.", "Inc", "Corp.", "Corp", "Ltd.", "Ltd", "LLC", "LLP", "Co.", "plc", "PLC", "GmbH",
    "AG", "SA", "Company", "Corporation", "Group", "Holdings", "Industries", "Technologies",
    "Systems", "Labs", "Partners", "Bank", "Airlines", "Motors", "Foundation", "Association",
    "Agency", "Council", "Committee", "Institute", "University", "College", "School",
    "Hospital", "Ministry", "Department",
];

/// Organization keywords that may lead a run ("University of Oxford")
pub const ORG_HEADS: &[&str] = &[
    "University", "Institute", "Bank", "Ministry", "Department", "Council", "Committee",
    "Association", "Federation", "College",
];

/// Countries, regions and cities, including multi-word names
pub const PLACES: &[&str] = &[
    "Cupertino", "New York", "New York City", "San Francisco", "Los Angeles", "Seattle",
    "Redmond", "Mountain View", "Palo Alto", "Menlo Park", "Silicon Valley", "Boston",
    "Chicago", "Washington", "Texas", "California", "Austin", "Miami", "Denver", "Atlanta",
    "London", "Paris", "Berlin", "Munich", "Madrid", "Rome", "Amsterdam", "Brussels",
    "Dublin", "Zurich", "Geneva", "Vienna", "Stockholm", "Oslo", "Moscow", "Kyiv", "Istanbul",
    "Tokyo", "Osaka", "Seoul", "Beijing", "Shanghai", "Shenzhen", "Hong Kong", "Taipei",
    "Singapore", "Mumbai", "Delhi", "New Delhi", "Bangalore", "Sydney", "Melbourne",
    "Toronto", "Vancouver", "Montreal", "Mexico City", "Sao Paulo", "Buenos Aires", "Cairo",
    "Lagos", "Nairobi", "Dubai", "Tel Aviv", "America", "United States", "United Kingdom",
    "Canada", "Mexico", "Brazil", "Argentina", "France", "Germany", "Italy", "Spain",
    "Portugal", "Ireland", "England", "Scotland", "Europe", "Asia", "Africa", "China",
    "Japan", "Korea", "South Korea", "India", "Australia", "Russia", "Ukraine", "Israel",
    "Egypt", "Nigeria", "Kenya", "Switzerland", "Netherlands", "Sweden", "Norway", "Poland",
    "Turkey", "Taiwan", "Vietnam", "Indonesia",
];

/// Capitalized words that never start or join a name
pub const CAPITALIZED_STOPWORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "It", "Its", "He", "She", "They", "We",
    "I", "You", "His", "Her", "Their", "Our", "My", "Your", "In", "On", "At", "By", "For",
    "From", "With", "To", "Of", "And", "But", "Or", "So", "Yet", "If", "When", "While",
    "After", "Before", "During", "Meanwhile", "However", "Moreover", "Furthermore", "Also",
    "Then", "There", "Here", "What", "Who", "Which", "Where", "Why", "How", "As", "Although",
    "Because", "Since", "Despite", "According", "Today", "Tomorrow", "Yesterday", "Last",
    "Next", "Earlier", "Later", "CEO", "CFO", "CTO", "COO", "Chairman", "Chief", "Executive",
    "Officer", "Director", "Manager", "Founder", "Co-founder",
];

/// Words joining the parts of a multi-word name
pub const NAME_CONNECTORS: &[&str] = &["of", "de", "da", "van", "von", "del", "la", "&"];

/// Prepositions after which an unclaimed capitalized word is a place
pub const PLACE_PREPOSITIONS: &[&str] = &["in", "at", "from", "near"];

pub const AUXILIARIES: &[&str] = &[
    "will", "would", "can", "could", "shall", "should", "may", "might", "must", "is", "are",
    "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does", "did",
];

/// Adverbs allowed between an auxiliary and its verb
pub const VERB_GROUP_FILLERS: &[&str] = &["not", "never", "also", "still", "just", "already", "soon"];

/// Base forms of common verbs; regular inflections are derived
pub const VERBS: &[&str] = &[
    "announce", "say", "report", "state", "create", "build", "develop", "increase",
    "decrease", "change", "visit", "comment", "exceed", "launch", "release", "acquire",
    "buy", "sell", "meet", "lead", "grow", "rise", "fall", "drop", "expect", "plan", "open",
    "close", "hire", "fire", "invest", "partner", "sign", "agree", "warn", "claim", "reveal",
    "confirm", "deny", "explain", "describe", "discuss", "introduce", "unveil", "win", "lose",
    "join", "leave", "move", "travel", "return", "arrive", "begin", "start", "end", "finish",
    "write", "speak", "tell", "talk", "ask", "answer", "show", "see", "make", "take", "give",
    "get", "go", "come", "know", "think", "believe", "want", "need", "use", "work", "run",
    "help", "try", "call", "become", "remain", "include", "provide", "continue", "expand",
    "reduce", "improve", "design", "produce", "publish", "found", "establish", "complete",
    "estimate", "predict", "forecast", "suggest", "propose", "approve", "reject", "bring",
    "hold", "keep", "pay", "earn", "spend", "raise", "cut", "post", "beat", "miss",
];

/// Irregular past forms and participles
pub const IRREGULAR_VERBS: &[&str] = &[
    "said", "built", "made", "took", "gave", "got", "went", "came", "knew", "thought", "told",
    "spoke", "wrote", "met", "led", "grew", "rose", "fell", "won", "lost", "left", "began",
    "saw", "sold", "bought", "brought", "held", "kept", "paid", "spent", "became", "ran",
    "done", "gone", "seen", "taken", "given", "written", "spoken", "known", "grown", "risen",
    "fallen", "begun", "beaten", "cut",
];

/// Words ending in -ed that are not past-tense verbs
pub const NON_VERB_ED: &[&str] = &[
    "need", "seed", "feed", "bed", "red", "speed", "hundred", "indeed", "shed", "bred",
    "breed", "greed", "weed", "sled", "bleed", "proceed", "succeed", "exceed",
];

/// Words that make a following -ed word adjectival
pub const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its",
    "our", "their", "some", "any", "no", "every", "each",
];

pub const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "twenty", "thirty", "forty", "fifty", "hundred", "thousand", "dozen",
];

pub const SCALE_WORDS: &[&str] = &["thousand", "million", "billion", "trillion", "percent", "%"];

macro_rules! word_set {
    ($name:ident, $list:expr) => {
        static $name: Lazy<HashSet<&'static str>> = Lazy::new(|| $list.iter().copied().collect());
    };
}

word_set!(ABBREVIATION_SET, ABBREVIATIONS);
word_set!(HONORIFIC_SET, HONORIFICS);
word_set!(FIRST_NAME_SET, FIRST_NAMES);
word_set!(ORGANIZATION_SET, ORGANIZATIONS);
word_set!(ORG_SUFFIX_SET, ORG_SUFFIXES);
word_set!(ORG_HEAD_SET, ORG_HEADS);
word_set!(PLACE_SET, PLACES);
word_set!(STOPWORD_SET, CAPITALIZED_STOPWORDS);
word_set!(AUXILIARY_SET, AUXILIARIES);
word_set!(IRREGULAR_SET, IRREGULAR_VERBS);
word_set!(NON_VERB_ED_SET, NON_VERB_ED);
word_set!(DETERMINER_SET, DETERMINERS);
word_set!(NUMBER_WORD_SET, NUMBER_WORDS);

/// Regular inflections of every base verb
static VERB_FORMS: Lazy<HashSet<String>> = Lazy::new(|| VERBS.iter().flat_map(|base| inflect(base)).collect());

/// Base, third person, past and gerund forms of a regular verb
fn inflect(base: &str) -> Vec<String> {
    let mut forms = vec![base.to_string()];
    let stem_e = base.strip_suffix('e');

    forms.push(if base.ends_with('s') || base.ends_with("sh") || base.ends_with("ch") || base.ends_with('o') {
        format!("{base}es")
    } else if base.ends_with('y') && !base.ends_with("ay") && !base.ends_with("ey") {
        format!("{}ies", &base[..base.len() - 1])
    } else {
        format!("{base}s")
    });

    match stem_e {
        Some(stem) => {
            forms.push(format!("{base}d"));
            forms.push(format!("{stem}ing"));
        }
        None if base.ends_with('y') && !base.ends_with("ay") && !base.ends_with("ey") => {
            forms.push(format!("{}ied", &base[..base.len() - 1]));
            forms.push(format!("{base}ing"));
        }
        None if doubles_final_consonant(base) => {
            let last = &base[base.len() - 1..];
            forms.push(format!("{base}{last}ed"));
            forms.push(format!("{base}{last}ing"));
        }
        None => {
            forms.push(format!("{base}ed"));
            forms.push(format!("{base}ing"));
        }
    }

    forms
}

/// Short consonant-vowel-consonant verbs: plan -> planned
fn doubles_final_consonant(base: &str) -> bool {
    let chars: Vec<char> = base.chars().collect();
    let n = chars.len();
    if n < 3 || n > 4 {
        return false;
    }
    let vowel = |c: char| "aeiou".contains(c);
    !vowel(chars[n - 1]) && vowel(chars[n - 2]) && !vowel(chars[n - 3]) && !"wxy".contains(chars[n - 1])
}

pub fn is_abbreviation(word: &str) -> bool {
    ABBREVIATION_SET.contains(word) || is_initial(word)
}

/// Single-letter initials and dotted acronyms: "J.", "U.S.A."
fn is_initial(word: &str) -> bool {
    let bytes = word.as_bytes();
    !bytes.is_empty()
        && bytes.len() % 2 == 0
        && bytes
            .chunks(2)
            .all(|pair| pair[0].is_ascii_alphabetic() && pair[1] == b'.')
}

pub fn is_honorific(word: &str) -> bool {
    HONORIFIC_SET.contains(word)
}

pub fn is_first_name(word: &str) -> bool {
    FIRST_NAME_SET.contains(word)
}

pub fn is_organization(name: &str) -> bool {
    ORGANIZATION_SET.contains(name)
}

pub fn is_org_suffix(word: &str) -> bool {
    ORG_SUFFIX_SET.contains(word)
}

pub fn is_org_head(word: &str) -> bool {
    ORG_HEAD_SET.contains(word)
}

pub fn is_place(name: &str) -> bool {
    PLACE_SET.contains(name)
}

pub fn is_capitalized_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

pub fn is_name_connector(word: &str) -> bool {
    NAME_CONNECTORS.contains(&word)
}

pub fn is_place_preposition(word: &str) -> bool {
    PLACE_PREPOSITIONS.contains(&word.to_lowercase().as_str())
}

pub fn is_auxiliary(word: &str) -> bool {
    AUXILIARY_SET.contains(word.to_lowercase().as_str())
}

pub fn is_verb_group_filler(word: &str) -> bool {
    VERB_GROUP_FILLERS.contains(&word.to_lowercase().as_str())
}

pub fn is_determiner(word: &str) -> bool {
    DETERMINER_SET.contains(word.to_lowercase().as_str())
}

pub fn is_number_word(word: &str) -> bool {
    NUMBER_WORD_SET.contains(word.to_lowercase().as_str())
}

pub fn is_scale_word(word: &str) -> bool {
    SCALE_WORDS.contains(&word.to_lowercase().as_str())
}

/// Known verb form (base, regular inflection or irregular)
pub fn is_verb_form(word: &str) -> bool {
    let lower = word.to_lowercase();
    VERB_FORMS.contains(&lower) || IRREGULAR_SET.contains(lower.as_str())
}

/// Inflected (non-base) verb form that stands on its own as a predicate
pub fn is_finite_verb_form(word: &str) -> bool {
    let lower = word.to_lowercase();
    if IRREGULAR_SET.contains(lower.as_str()) {
        return true;
    }
    VERB_FORMS.contains(&lower) && !VERBS.contains(&lower.as_str())
}

/// Lowercase word that looks like a regular past tense
pub fn looks_past_tense(word: &str) -> bool {
    word.len() >= 5
        && word.ends_with("ed")
        && word.chars().all(|c| c.is_ascii_lowercase())
        && !NON_VERB_ED_SET.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflections() {
        assert!(is_verb_form("announced"));
        assert!(is_verb_form("announces"));
        assert!(is_verb_form("visit"));
        assert!(is_verb_form("exceeding"));
        assert!(is_verb_form("planned"));
        assert!(is_verb_form("tries"));
        assert!(is_verb_form("said"));
        assert!(!is_verb_form("revenue"));
    }

    #[test]
    fn test_finite_forms_exclude_base() {
        assert!(is_finite_verb_form("reported"));
        assert!(is_finite_verb_form("commented"));
        assert!(!is_finite_verb_form("visit"));
        assert!(!is_finite_verb_form("report"));
    }

    #[test]
    fn test_abbreviations_and_initials() {
        assert!(is_abbreviation("Inc."));
        assert!(is_abbreviation("J."));
        assert!(is_abbreviation("U.S.A."));
        assert!(!is_abbreviation("month."));
    }

    #[test]
    fn test_past_tense_heuristic() {
        assert!(looks_past_tense("commented"));
        assert!(!looks_past_tense("hundred"));
        assert!(!looks_past_tense("Red"));
    }

    #[test]
    fn test_lexicons() {
        assert!(is_place("New York"));
        assert!(is_organization("Microsoft"));
        assert!(is_org_suffix("Inc."));
        assert!(is_first_name("Satya"));
        assert!(is_capitalized_stopword("Meanwhile"));
        assert!(is_auxiliary("Will"));
    }
}
