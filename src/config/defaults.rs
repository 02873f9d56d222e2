//! Built-in dictionaries: jargon terms, the libraries that justify them, and
//! the heavyweight library table used for fake-import detection

use indexmap::IndexMap;

const JARGON: &[(&str, &[&str])] = &[
    (
        "quality",
        &[
            "state-of-the-art",
            "cutting-edge",
            "world-class",
            "best-in-class",
            "enterprise-grade",
            "production-ready",
            "battle-tested",
            "robust",
            "comprehensive",
            "sophisticated",
            "advanced",
            "elegant",
            "seamless",
            "seamlessly",
        ],
    ),
    (
        "architecture",
        &[
            "microservices",
            "event-driven",
            "serverless",
            "hexagonal",
            "cloud-native",
            "decoupled",
            "extensible",
            "pluggable",
            "modular",
        ],
    ),
    (
        "performance",
        &[
            "blazing fast",
            "blazingly fast",
            "lightning-fast",
            "ultra-fast",
            "high-performance",
            "low-latency",
            "zero-copy",
            "performant",
            "optimized",
            "optimal",
            "efficient",
        ],
    ),
    (
        "security",
        &[
            "military-grade",
            "bank-grade",
            "zero-trust",
            "tamper-proof",
            "hardened",
            "encrypted",
            "secure",
        ],
    ),
    (
        "scale",
        &[
            "horizontally scalable",
            "highly scalable",
            "massively parallel",
            "high-availability",
            "fault-tolerant",
            "distributed",
            "resilient",
            "scalable",
        ],
    ),
    (
        "ai",
        &[
            "ai-powered",
            "deep learning",
            "machine learning",
            "self-learning",
            "intelligent",
            "neural",
            "transformer",
        ],
    ),
];

const JUSTIFICATIONS: &[(&str, &[&str])] = &[
    ("neural", &["torch", "tensorflow", "keras", "jax"]),
    ("deep learning", &["torch", "tensorflow", "keras", "jax"]),
    (
        "machine learning",
        &["sklearn", "torch", "tensorflow", "xgboost", "lightgbm"],
    ),
    ("transformer", &["transformers", "torch"]),
    ("distributed", &["ray", "dask", "pyspark", "celery"]),
    ("scalable", &["ray", "dask", "celery"]),
    ("massively parallel", &["ray", "dask", "multiprocessing"]),
    ("encrypted", &["cryptography", "nacl", "ssl"]),
    ("secure", &["cryptography", "secrets", "ssl", "hashlib"]),
    ("optimized", &["numpy", "numba", "scipy"]),
    ("high-performance", &["numpy", "numba", "polars"]),
];

const HEAVY_LIBRARIES: &[(&str, &[&str])] = &[
    (
        "ml",
        &[
            "torch",
            "tensorflow",
            "keras",
            "jax",
            "transformers",
            "sklearn",
            "xgboost",
            "lightgbm",
        ],
    ),
    ("data", &["numpy", "pandas", "scipy", "polars"]),
    ("http", &["requests", "aiohttp", "httpx", "urllib3"]),
    (
        "database",
        &["sqlalchemy", "pymongo", "psycopg2", "redis", "motor", "peewee"],
    ),
    ("web", &["flask", "django", "fastapi"]),
    ("cloud", &["boto3"]),
];

/// File name globs exempt from inflation scoring
pub const CONFIG_FILE_PATTERNS: &[&str] = &[
    "**/settings.py",
    "**/config.py",
    "**/*_config.py",
    "**/conf.py",
    "**/constants.py",
    "**/*.conf",
    "**/*.config",
];

/// Paths never worth scanning
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/.venv/**",
    "**/venv/**",
    "**/site-packages/**",
    "**/__pycache__/**",
    "**/.git/**",
    "**/node_modules/**",
];

fn table(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

pub fn jargon() -> IndexMap<String, Vec<String>> {
    table(JARGON)
}

pub fn justifications() -> IndexMap<String, Vec<String>> {
    table(JUSTIFICATIONS)
}

pub fn heavy_libraries() -> IndexMap<String, Vec<String>> {
    table(HEAVY_LIBRARIES)
}

pub fn config_file_patterns() -> Vec<String> {
    CONFIG_FILE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

pub fn ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}
