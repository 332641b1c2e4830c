//! Word supply for falling words.
//!
//! Words are bucketed by length; the pool remembers recently served words so
//! the same word does not come back within a short stretch of play.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;
use thiserror::Error;

/// How many recently served words are remembered (and persisted).
pub const MAX_RECENT_WORDS: usize = 50;

/// Bucket used when the requested length has no words.
pub const FALLBACK_LENGTH: usize = 4;

// -----------------------------------------------------------------------------
// Built-in dataset (lowercase ASCII, unique)
// -----------------------------------------------------------------------------

pub const WORDS: &[&str] = &[
    // 3 letters
    "ant", "arm", "bag", "bat", "bed", "box", "bus", "cap", "car", "cat", "cow", "cup", "dog",
    "ear", "egg", "elf", "fan", "fig", "fox", "gem", "hat", "ink", "jam", "jet", "key", "kit",
    "log", "map", "mud", "net", "owl", "pan", "pen", "pig", "pot", "ram", "rat", "sun", "toy",
    "van", "web", "yak",
    // 4 letters
    "acid", "bake", "bark", "bell", "bird", "boat", "bolt", "book", "cake", "calm", "cave", "coin",
    "cold", "crow", "dart", "dawn", "deer", "disk", "dove", "drum", "dusk", "dust", "echo", "face",
    "fern", "fish", "flag", "foam", "frog", "gate", "gift", "glow", "goat", "gold", "harp", "hawk",
    "hill", "horn", "iron", "jade", "jazz", "kite", "lake", "lamp", "leaf", "lime", "lion", "lynx",
    "mask", "mint", "mist", "moon", "moss", "nest", "oven", "palm", "pear", "pine", "pond", "rain",
    "reef", "ring", "road", "rock", "rose", "ruby", "sail", "salt", "sand", "seed", "ship", "silk",
    "snow", "star", "tent", "tide", "tree", "vase", "vine", "wave", "wolf", "yarn", "zinc", "zoom",
    // 5 letters
    "amber", "angel", "apple", "arrow", "bacon", "beach", "berry", "blaze", "bloom", "brave",
    "bread", "brick", "brush", "cabin", "candy", "chalk", "charm", "chess", "cider", "cliff",
    "cloud", "comet", "coral", "crane", "crown", "dance", "dream", "eagle", "earth", "ember",
    "fable", "feast", "flame", "flute", "frost", "ghost", "giant", "grape", "grass", "heart",
    "honey", "house", "ivory", "jewel", "juice", "knife", "lemon", "light", "magic", "mango",
    "maple", "melon", "night", "ocean", "olive", "orbit", "otter", "pearl", "piano", "pixel",
    "plume", "quest", "quill", "raven", "river", "robot", "salad", "scale", "shell", "spark",
    "spice", "stone", "storm", "sugar", "tiger", "toast", "torch", "tower", "train", "vapor",
    "whale", "wheat", "witch", "zebra",
    // 6 letters
    "anchor", "bamboo", "basket", "beacon", "breeze", "bridge", "bronze", "butter", "cactus",
    "candle", "canvas", "carrot", "castle", "cherry", "cobalt", "cookie", "copper", "cosmic",
    "dragon", "falcon", "forest", "galaxy", "garden", "ginger", "glider", "goblin", "hammer",
    "harbor", "helmet", "island", "jacket", "jaguar", "jungle", "kernel", "ladder", "lagoon",
    "legend", "lizard", "marble", "meadow", "mirror", "monkey", "nebula", "nectar", "orange",
    "oyster", "parrot", "pepper", "pirate", "planet", "potion", "puzzle", "quartz", "rabbit",
    "rocket", "saddle", "salmon", "shadow", "silver", "spirit", "summit", "sunset", "temple",
    "thorns", "throne", "tunnel", "velvet", "violet", "wizard", "yogurt", "zephyr",
    // 7 letters
    "acrobat", "balloon", "banquet", "blossom", "brewing", "buffalo", "cabbage", "caramel",
    "chimney", "citadel", "compass", "cyclone", "diamond", "dolphin", "eclipse", "emerald",
    "feather", "firefly", "fortune", "gallery", "giraffe", "glacier", "harvest", "horizon",
    "iceberg", "journey", "kingdom", "lantern", "library", "lobster", "mammoth", "mermaid",
    "monsoon", "mustard", "octopus", "orchard", "panther", "pelican", "phoenix", "pilgrim",
    "pumpkin", "pyramid", "rainbow", "scarlet", "serpent", "spinach", "stadium", "sunrise",
    "thunder", "tornado", "trumpet", "typhoon", "unicorn", "vampire", "volcano", "warrior",
    "whisper",
    // 8 letters
    "aardvark", "absolute", "airplane", "alphabet", "amethyst", "antelope", "asteroid", "backpack",
    "blizzard", "bracelet", "calendar", "cardinal", "carnival", "champion", "chestnut", "cinnamon",
    "crescent", "dinosaur", "elephant", "fireball", "flamingo", "gardenia", "gemstone", "hedgehog",
    "horsefly", "kangaroo", "keyboard", "lavender", "mandarin", "marathon", "mosquito", "mountain",
    "mushroom", "nightowl", "notebook", "obsidian", "ornament", "panorama", "platinum", "question",
    "sandwich", "sapphire", "scorpion", "seahorse", "skeleton", "snowball", "squirrel", "stardust",
    "starfish", "sunlight", "tomahawk", "treasure", "triangle", "umbrella", "vineyard", "woodland",
    // 9 letters
    "accordion", "adventure", "alligator", "astronaut", "avalanche", "bookshelf", "boulevard",
    "butterfly", "cathedral", "chameleon", "chocolate", "clockwork", "crocodile", "crossroad",
    "dandelion", "dragonfly", "evergreen", "evolution", "fireplace", "fireworks", "gladiator",
    "grassland", "halloween", "hurricane", "jellyfish", "labyrinth", "lightning", "magnitude",
    "meteorite", "mousetrap", "nightfall", "nightmare", "orchestra", "parachute", "pineapple",
    "porcelain", "porcupine", "sandstorm", "scarecrow", "snowflake", "spaceship", "starlight",
    "sunflower", "telescope", "thesaurus", "threshold", "turquoise", "waterfall", "waterfowl",
    "whirlpool", "wolfsbane",
    // 10 letters
    "apocalypse", "background", "blacksmith", "blueprints", "campground", "chandelier",
    "chimpanzee", "cloudburst", "earthquake", "friendship", "lighthouse", "masquerade",
    "moonstones", "motorcycle", "nightshade", "peppermint", "playground", "rhinoceros",
    "saxophones", "skateboard", "snowstorms", "stalactite", "strawberry", "submarines",
    "sweetheart", "tambourine", "thunderous", "toothbrush", "trampoline", "underworld",
    "watermelon", "wildflower", "windshield", "woodpecker",
];

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("word list parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("bucket key '{0}' is not a word length")]
    BadLength(String),

    #[error("word list is empty")]
    Empty,
}

/// Length-bucketed words plus the recently-served memory.
#[derive(Clone, Debug)]
pub struct WordPool {
    by_length: BTreeMap<usize, Vec<String>>,
    recent: VecDeque<String>, // oldest first
}

impl WordPool {
    /// Pool over the built-in dataset, bucketed by actual length.
    pub fn builtin() -> Self {
        Self::from_words(WORDS.iter().copied())
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_length: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for w in words {
            let w = w.trim().to_ascii_lowercase();
            if w.is_empty() || !w.chars().all(|c| c.is_ascii_lowercase()) {
                continue;
            }
            let bucket = by_length.entry(w.len()).or_default();
            if !bucket.contains(&w) {
                bucket.push(w);
            }
        }
        Self { by_length, recent: VecDeque::new() }
    }

    /// Parse a `{"4": ["word", ...], "5": [...]}` object. The keys only
    /// label the buckets; words are re-bucketed by their real length.
    pub fn from_json(json: &str) -> Result<Self, WordListError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        for key in raw.keys() {
            if key.parse::<usize>().is_err() {
                return Err(WordListError::BadLength(key.clone()));
            }
        }
        let pool = Self::from_words(raw.values().flatten().map(String::as_str));
        if pool.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(pool)
    }

    pub fn is_empty(&self) -> bool {
        self.by_length.values().all(Vec::is_empty)
    }

    pub fn words_of_length(&self, length: usize) -> &[String] {
        self.by_length.get(&length).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bucket actually used for a request of `length`: the exact bucket, then
    /// the fallback length, then the nearest non-empty length.
    pub fn resolve_length(&self, length: usize) -> Option<usize> {
        if !self.words_of_length(length).is_empty() {
            return Some(length);
        }
        if !self.words_of_length(FALLBACK_LENGTH).is_empty() {
            return Some(FALLBACK_LENGTH);
        }
        self.by_length
            .iter()
            .filter(|(_, words)| !words.is_empty())
            .map(|(len, _)| *len)
            .min_by_key(|len| len.abs_diff(length))
    }

    /// Serve a word of (about) `length` letters, avoiding recent repeats.
    pub fn pick<R: Rng + ?Sized>(&mut self, length: usize, rng: &mut R) -> Option<String> {
        let length = self.resolve_length(length)?;
        let words = self.by_length.get(&length)?;

        let available: Vec<&String> = words.iter().filter(|w| !self.recent.contains(*w)).collect();
        if available.is_empty() {
            // Bucket exhausted: forget the older half and serve any word.
            let forget = self.recent.len() / 2;
            self.recent.drain(..forget);
            let word = words[rng.random_range(0..words.len())].clone();
            return Some(word);
        }

        let word = available[rng.random_range(0..available.len())].clone();
        self.remember(word.clone());
        Some(word)
    }

    fn remember(&mut self, word: String) {
        self.recent.push_back(word);
        while self.recent.len() > MAX_RECENT_WORDS {
            self.recent.pop_front();
        }
    }

    /// Recently served words, oldest first.
    pub fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    /// Load a persisted recent list; only the last `MAX_RECENT_WORDS` are kept.
    pub fn restore_recent(&mut self, words: Vec<String>) {
        self.recent.clear();
        for w in words {
            if !self.recent.contains(&w) {
                self.remember(w);
            }
        }
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::builtin()
    }
}
