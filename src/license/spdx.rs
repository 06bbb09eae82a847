/// Tag used when a license file is found but its text matches no known license.
pub const UNRECOGNIZED: &str = "unrecognized";

/// Identify the SPDX identifier of a license text by its characteristic phrases.
///
/// Checks run from the most to the least specific family, since e.g. the
/// LGPL text quotes the GPL and the ISC grant resembles MIT.
pub fn identify(text: &str) -> &'static str {
    let text = normalize(text);
    let has = |phrase: &str| text.contains(phrase);

    if has("gnu affero general public license") {
        return "AGPL-3.0";
    }
    if has("gnu lesser general public license") || has("gnu library general public license") {
        return if has("version 3") { "LGPL-3.0" } else { "LGPL-2.1" };
    }
    if has("gnu general public license") {
        return if has("version 3") { "GPL-3.0" } else { "GPL-2.0" };
    }
    if has("mozilla public license version 2.0") || has("mozilla public license, version 2.0") {
        return "MPL-2.0";
    }
    if has("apache license") && has("version 2.0") {
        return "Apache-2.0";
    }
    if has("this is free and unencumbered software released into the public domain") {
        return "Unlicense";
    }
    if has("cc0 1.0 universal") {
        return "CC0-1.0";
    }
    if has("permission to use, copy, modify, and/or distribute this software for any purpose") {
        return "ISC";
    }
    if has("permission is hereby granted, free of charge, to any person obtaining a copy") {
        return "MIT";
    }
    if has("redistribution and use in source and binary forms") {
        return if has("neither the name") || has("may be used to endorse or promote") {
            "BSD-3-Clause"
        } else {
            "BSD-2-Clause"
        };
    }
    if has("boost software license") {
        return "BSL-1.0";
    }
    if has("provided 'as-is', without any express or implied warranty") {
        return "Zlib";
    }

    UNRECOGNIZED
}

/// Lowercase and collapse all whitespace runs (line wraps, indentation) to one space.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
