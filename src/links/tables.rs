//! Static lookup tables for the link pattern table.
//!
//! Plain data; [`super::PatternTable::with_tables`] accepts other tables in
//! their place.

/// Suffixes accepted by the bare-domain category (`example.com`, `shop.store`).
///
/// Generic, country-code and novelty suffixes. Matching is case-insensitive.
pub const KNOWN_SUFFIXES: &[&str] = &[
    "com", "org", "net", "edu", "gov", "mil", "int", "co", "uk", "de", "fr", "it", "es", "ru",
    "jp", "cn", "au", "ca", "br", "in", "za", "mx", "ar", "cl", "pe", "ve", "bo", "py", "uy",
    "ec", "gf", "sr", "gy", "fk", "io", "ly", "me", "tv", "cc", "tk", "ml", "ga", "cf", "to",
    "ws", "biz", "info", "name", "mobi", "tel", "travel", "museum", "aero", "coop", "jobs",
    "post", "xxx", "asia", "cat", "pro", "app", "dev", "page", "tech", "online", "site",
    "store", "shop", "blog", "news", "link", "click", "today", "world", "global", "earth",
    "space", "cloud", "ai", "bot", "web", "digital", "cyber", "data", "network", "systems",
    "solutions", "services", "group", "team", "company", "corp", "inc", "ltd", "llc", "plc",
    "gmbh", "sarl", "srl", "bv", "ab", "as", "oy", "kft", "spa", "sas", "eurl", "snc", "scp",
    "sei", "scarl", "scrl", "cvba", "cvoa", "eeig", "se", "scic", "sccl", "cic", "community",
    "foundation", "ngo", "charity", "academy", "university", "school", "college", "institute",
    "center", "centre", "club", "society", "association", "union", "federation", "alliance",
    "forum", "board", "council", "committee", "commission", "organization", "organisation",
    "agency", "bureau", "office", "department", "ministry", "government", "administration",
    "authority", "court", "tribunal", "parliament", "congress", "senate", "assembly",
    "legislature", "chamber", "house", "city", "state", "county", "province", "region",
    "district", "municipality", "town", "village", "parish", "ward", "zone", "area", "sector",
    "quarter", "block", "street", "avenue", "road", "lane", "drive", "way", "path", "trail",
    "route", "highway", "bridge", "tunnel", "port", "airport", "station", "terminal",
    "platform", "stop", "junction", "crossing", "square", "plaza", "park", "garden", "field",
    "ground", "yard", "place", "building", "tower", "mall", "market", "restaurant", "hotel",
    "inn", "motel", "hostel", "resort", "gym", "bar", "pub", "cafe", "coffee", "tea", "pizza",
    "burger", "food", "drink", "wine", "beer", "music", "movie", "cinema", "theater",
    "theatre", "gallery", "library", "bookstore", "hospital", "clinic", "pharmacy", "bank",
    "atm", "gas", "fuel", "car", "auto", "bike", "bus", "train", "plane", "boat", "ship",
    "taxi", "uber", "lyft", "delivery", "mail", "package", "gift", "flower", "pet", "vet",
    "beauty", "hair", "nail", "massage", "fitness", "yoga", "dance", "sport", "game", "toy",
    "baby", "kid", "child", "family", "wedding", "party", "event", "meeting", "conference",
    "seminar", "workshop", "training", "course", "class", "lesson", "tutor", "coach", "guide",
    "tour", "trip", "vacation", "holiday", "flight", "ticket", "booking", "reservation",
    "rental", "lease", "sale", "buy", "sell", "trade", "exchange", "auction", "bid", "offer",
    "deal", "discount", "coupon", "promo", "free", "cheap", "best", "top", "new", "hot",
    "cool", "awesome", "amazing", "great", "good", "nice", "beautiful", "lovely", "cute",
    "sweet", "funny", "interesting", "useful", "helpful", "important", "special", "unique",
    "rare", "limited", "exclusive", "premium", "luxury", "quality", "professional", "expert",
    "master", "guru", "super", "mega", "ultra", "max", "plus", "extra", "more", "less", "big",
    "small", "large", "tiny", "huge", "mini", "micro", "nano", "giant", "jumbo", "king",
    "queen", "royal", "noble", "elite", "vip", "gold", "silver", "bronze", "diamond",
    "platinum", "crystal", "pearl", "ruby", "emerald", "sapphire", "amber", "jade", "coral",
    "ivory", "marble", "granite", "wood", "metal", "glass", "plastic", "paper", "cloth",
    "leather", "silk", "cotton", "wool", "fur", "feather", "stone", "rock", "sand", "dirt",
    "mud", "water", "fire", "air", "wind", "rain", "snow", "ice", "sun", "moon", "star",
    "planet", "sky", "mountain", "hill", "valley", "river", "lake", "sea", "ocean", "beach",
    "island", "forest", "tree", "grass", "leaf", "fruit", "vegetable", "meat", "fish", "bird",
    "animal", "insect", "bug", "spider", "snake", "dog", "horse", "cow", "pig", "sheep",
    "goat", "chicken", "duck", "shark", "whale", "dolphin", "turtle", "frog", "butterfly",
    "bee", "ant", "lion", "tiger", "elephant", "bear", "wolf", "fox", "deer", "rabbit",
    "mouse", "rat", "hamster", "eagle", "hawk", "owl", "parrot", "penguin", "flamingo",
    "peacock", "swan", "crane", "stork", "pelican", "seagull", "pigeon", "crow", "raven",
    "sparrow", "robin", "blue", "red", "green", "yellow", "orange", "purple", "pink", "black",
    "white", "gray", "grey", "brown", "tan", "beige", "cream", "copper", "iron", "steel",
    "aluminum", "rubber", "brick", "concrete", "jewel", "gem", "ring", "necklace", "bracelet",
    "earring", "watch", "clock", "time", "hour", "minute", "second", "day", "week", "month",
    "year", "century", "millennium", "past", "present", "future", "old", "young", "adult",
    "boy", "girl", "man", "woman", "male", "female", "person", "people", "human", "friend",
    "love", "heart", "soul", "mind", "body", "health", "life", "death", "birth", "happiness",
    "joy", "peace", "hope", "dream", "wish", "luck", "success", "win", "victory", "champion",
    "hero", "celebrity", "famous", "popular", "worst", "bad", "right", "wrong", "true",
    "false", "real", "fake", "original", "copy", "first", "last", "next", "previous", "before",
    "after", "up", "down", "left", "front", "back", "inside", "outside", "bottom", "high",
    "low", "fast", "slow", "quick", "easy", "hard", "difficult", "simple", "complex", "long",
    "short", "wide", "narrow", "thick", "thin", "heavy", "light", "strong", "weak", "cold",
    "warm", "wet", "dry", "clean", "dirty", "fresh", "modern", "ancient", "classic", "vintage",
    "retro", "now", "tomorrow", "yesterday", "morning", "afternoon", "evening", "night",
    "midnight", "noon", "dawn", "dusk", "sunrise", "sunset", "spring", "summer", "autumn",
    "fall", "winter", "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday",
];

/// URL shorteners and link aggregators. A path segment is required after the host.
pub const SHORTENER_HOSTS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "short.link",
    "tiny.cc",
    "is.gd",
    "buff.ly",
    "ift.tt",
    "youtu.be",
    "amzn.to",
    "fb.me",
    "ln.is",
    "tiny.one",
    "rb.gy",
    "cutt.ly",
    "short.io",
    "link.tree",
    "linktr.ee",
];

/// Chat-invite and messaging deep-link hosts. A path segment is required after the host.
pub const PLATFORM_SHORT_LINK_HOSTS: &[&str] = &[
    "t.me",
    "telegram.me",
    "discord.gg",
    "wa.me",
    "chat.whatsapp.com",
];
