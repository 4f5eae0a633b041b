//! Source languages and their standards.

use serde::{Deserialize, Serialize};

/// Source language of the extension module.
///
/// Selects the compiler driver (`cc` vs `c++`) and how `build.std` is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language
    C,
    /// C++ language (default)
    #[default]
    #[serde(rename = "c++", alias = "cpp", alias = "cxx")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Parse a standard string (e.g. "20", "c++17", "c11") for this language.
    pub fn parse_standard(&self, s: &str) -> Result<Standard, StandardParseError> {
        match self {
            Language::C => s.parse().map(Standard::C),
            Language::Cxx => s.parse().map(Standard::Cxx),
        }
    }
}

/// A language standard, tagged by language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "lang", content = "std", rename_all = "lowercase")]
pub enum Standard {
    C(CStandard),
    Cxx(CppStandard),
}

impl Standard {
    /// Value for GCC/Clang `-std=`.
    pub fn gnu_flag_value(&self) -> &'static str {
        match self {
            Standard::C(s) => s.as_flag_value(),
            Standard::Cxx(s) => s.as_flag_value(),
        }
    }

    /// Value for MSVC `/std:`.
    pub fn msvc_flag_value(&self) -> &'static str {
        match self {
            Standard::C(s) => s.as_msvc_flag_value(),
            Standard::Cxx(s) => s.as_msvc_flag_value(),
        }
    }
}

/// C++ standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    #[serde(rename = "11")]
    Cpp11,
    #[serde(rename = "14")]
    Cpp14,
    #[serde(rename = "17")]
    Cpp17,
    #[serde(rename = "20")]
    Cpp20,
    #[serde(rename = "23")]
    Cpp23,
}

impl CppStandard {
    /// Get the standard as a compiler flag value (e.g., "c++17").
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++11",
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++23",
        }
    }

    /// Get the MSVC-style standard flag value (e.g., "c++17", "c++latest" for C++23).
    pub fn as_msvc_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++14", // cl.exe has no c++11 mode
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++latest",
        }
    }
}

impl std::str::FromStr for CppStandard {
    type Err = StandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" | "c++11" | "cpp11" => Ok(CppStandard::Cpp11),
            "14" | "c++14" | "cpp14" => Ok(CppStandard::Cpp14),
            "17" | "c++17" | "cpp17" => Ok(CppStandard::Cpp17),
            "20" | "c++20" | "cpp20" => Ok(CppStandard::Cpp20),
            "23" | "c++23" | "cpp23" => Ok(CppStandard::Cpp23),
            _ => Err(StandardParseError {
                value: s.to_string(),
                language: Language::Cxx,
            }),
        }
    }
}

/// C standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CStandard {
    #[serde(rename = "99")]
    C99,
    #[serde(rename = "11")]
    C11,
    #[serde(rename = "17")]
    C17,
}

impl CStandard {
    /// Get the standard as a compiler flag value (e.g., "c11").
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            CStandard::C99 => "c99",
            CStandard::C11 => "c11",
            CStandard::C17 => "c17",
        }
    }

    /// MSVC only knows c11 and c17.
    pub fn as_msvc_flag_value(&self) -> &'static str {
        match self {
            CStandard::C99 | CStandard::C11 => "c11",
            CStandard::C17 => "c17",
        }
    }
}

impl std::str::FromStr for CStandard {
    type Err = StandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "99" | "c99" | "C99" => Ok(CStandard::C99),
            "11" | "c11" | "C11" => Ok(CStandard::C11),
            "17" | "c17" | "C17" | "18" | "c18" | "C18" => Ok(CStandard::C17),
            _ => Err(StandardParseError {
                value: s.to_string(),
                language: Language::C,
            }),
        }
    }
}

/// Error returned when parsing an invalid standard string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {} standard '{value}', valid values: {}", .language.as_str(), valid_values(.language))]
pub struct StandardParseError {
    pub value: String,
    pub language: Language,
}

fn valid_values(language: &Language) -> &'static str {
    match language {
        Language::C => "99, 11, 17",
        Language::Cxx => "11, 14, 17, 20, 23",
    }
}
