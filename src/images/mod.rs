pub mod probe;
pub mod resolver;

pub use probe::{HttpImageProbe, ImageProbe};
pub use resolver::{ImageResolution, ImageResolver, ImageSource};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Guaranteed-available image used whenever anything else fails.
pub const STATIC_PLACEHOLDER: &str = "https://placehold.co/600x400/png?text=AutoContent";

pub const CAR_KEYWORDS: [&str; 8] = [
    "car",
    "sportscar",
    "vintage-car",
    "supercar",
    "racing",
    "diecast",
    "hotwheels",
    "classic-car",
];

/// Source of randomness for candidate selection.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;

    fn next_seed(&mut self) -> u32;
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn next_seed(&mut self) -> u32 {
        self.rng.gen_range(1..=1000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTemplate {
    /// `https://picsum.photos/seed/{n}/600/400`
    PicsumSeed,
    /// `https://loremflickr.com/600/400/{keyword}?lock={n}`
    LoremFlickr,
    /// `https://placehold.co/600x400/png?text={keyword}`
    PlaceholdText,
}

impl ImageTemplate {
    pub fn render(&self, keyword: &str, seed: u32) -> String {
        match self {
            ImageTemplate::PicsumSeed => format!("https://picsum.photos/seed/{}/600/400", seed),
            ImageTemplate::LoremFlickr => {
                format!("https://loremflickr.com/600/400/{}?lock={}", keyword, seed)
            }
            ImageTemplate::PlaceholdText => {
                format!("https://placehold.co/600x400/png?text={}", keyword)
            }
        }
    }
}

/// Fixed pool of placeholder-service templates a fallback candidate is drawn from.
#[derive(Debug, Clone)]
pub struct ImageCandidatePool {
    templates: Vec<ImageTemplate>,
    keywords: Vec<String>,
}

impl Default for ImageCandidatePool {
    fn default() -> Self {
        Self {
            templates: vec![
                ImageTemplate::PicsumSeed,
                ImageTemplate::LoremFlickr,
                ImageTemplate::PlaceholdText,
            ],
            keywords: CAR_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ImageCandidatePool {
    pub fn new(templates: Vec<ImageTemplate>, keywords: Vec<String>) -> Self {
        Self {
            templates,
            keywords,
        }
    }

    /// Falls back to the static placeholder when the pool is empty.
    pub fn pick(&self, random: &mut dyn RandomSource) -> String {
        if self.templates.is_empty() {
            return STATIC_PLACEHOLDER.to_string();
        }
        let template = self.templates[random.next_index(self.templates.len())];
        let keyword = if self.keywords.is_empty() {
            "car"
        } else {
            self.keywords[random.next_index(self.keywords.len())].as_str()
        };
        let seed = random.next_seed();
        template.render(keyword, seed)
    }

    /// Several distinct draws followed by the static placeholder.
    pub fn candidates(&self, random: &mut dyn RandomSource, count: usize) -> ImageCandidates {
        let mut urls: Vec<String> = Vec::with_capacity(count + 1);
        for _ in 0..count {
            let url = self.pick(random);
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        ImageCandidates::new(urls)
    }
}

/// Ordered candidate URLs. The last entry is always the static placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidates {
    urls: Vec<String>,
}

impl ImageCandidates {
    pub fn new(mut urls: Vec<String>) -> Self {
        urls.retain(|url| !url.trim().is_empty());
        if urls.last().map(String::as_str) != Some(STATIC_PLACEHOLDER) {
            urls.push(STATIC_PLACEHOLDER.to_string());
        }
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// First candidate the probe accepts; the last one is used unconditionally.
    pub async fn first_accepted(&self, probe: &dyn ImageProbe) -> String {
        let (last, rest) = match self.urls.split_last() {
            Some(split) => split,
            None => return STATIC_PLACEHOLDER.to_string(),
        };
        for url in rest {
            match probe.check(url).await {
                Ok(()) => return url.clone(),
                Err(e) => log::debug!("Skipping image candidate: {}", e),
            }
        }
        last.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;
    use std::collections::VecDeque;

    /// Replays fixed values; index draws are taken modulo `len`.
    pub struct FixedRandom {
        values: VecDeque<u32>,
    }

    impl FixedRandom {
        pub fn new(values: &[u32]) -> Self {
            Self {
                values: values.iter().copied().collect(),
            }
        }

        fn next(&mut self) -> u32 {
            let value = self.values.pop_front().unwrap_or(0);
            self.values.push_back(value);
            value
        }
    }

    impl RandomSource for FixedRandom {
        fn next_index(&mut self, len: usize) -> usize {
            self.next() as usize % len
        }

        fn next_seed(&mut self) -> u32 {
            self.next()
        }
    }
}
