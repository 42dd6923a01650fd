// S3DropBox Rust client for Amazon S3 style object storage
// Copyright 2026 S3DropBox Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::s3::utils::url_encode;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

/// Prefix of user metadata headers
pub const META_DATA_PREFIX: &str = "x-amz-meta-";

const AMZ_HEADER_PREFIX: &str = "x-amz-";

/// Strips embedded newlines and surrounding whitespace from a header value.
///
/// Returns `Cow::Borrowed` when no transformation is needed.
#[inline]
fn clean_value(s: &str) -> Cow<'_, str> {
    if !s.contains('\n') {
        return Cow::Borrowed(s.trim());
    }
    Cow::Owned(s.replace('\n', "").trim().to_string())
}

fn is_signed_header(lowercase_key: &str) -> bool {
    lowercase_key.starts_with(AMZ_HEADER_PREFIX)
        || lowercase_key == "content-md5"
        || lowercase_key == "content-type"
        || lowercase_key == "date"
}

pub trait MultimapExt {
    /// Adds a key-value pair to the multimap; existing values are kept
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Adds a user metadata value under the `x-amz-meta-` prefix
    fn add_meta_data<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V);

    /// Case-insensitive key lookup
    fn contains_key_ignore_case(&self, key: &str) -> bool;

    /// All values stored under any casing of `key`, in insertion order per casing
    fn get_all_ignore_case(&self, key: &str) -> Vec<&str>;

    /// Converts multimap to HTTP query string, keys in sorted order
    fn to_query_string(&self) -> String;

    /// Returns the headers that take part in request signing, keyed by lowercase
    /// name with their values cleaned and joined by `,`
    fn get_canonical_headers(&self) -> BTreeMap<String, String>;
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn add_meta_data<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(
            format!("{META_DATA_PREFIX}{}", key.as_ref()),
            value.into(),
        );
    }

    fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.keys().any(|k| k.eq_ignore_ascii_case(key))
    }

    fn get_all_ignore_case(&self, key: &str) -> Vec<&str> {
        // sort the matching casings so the result does not depend on hash order
        let mut keys: Vec<&String> = self
            .keys()
            .filter(|k| k.eq_ignore_ascii_case(key))
            .collect();
        keys.sort();

        keys.into_iter()
            .filter_map(|k| self.get_vec(k))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn to_query_string(&self) -> String {
        // sorted by key so equal maps always render the same URL
        let sorted: BTreeMap<&String, &Vec<String>> = self.iter_all().collect();
        let mut query = String::new();
        for (key, values) in sorted {
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&url_encode(key));
                query.push('=');
                query.push_str(&url_encode(value));
            }
        }
        query
    }

    fn get_canonical_headers(&self) -> BTreeMap<String, String> {
        let mut btmap: BTreeMap<String, String> = BTreeMap::new();

        for k in self.keys() {
            let key = k.to_lowercase();
            if !is_signed_header(&key) || btmap.contains_key(&key) {
                continue;
            }

            let mut value = String::new();
            for v in self.get_all_ignore_case(&key) {
                if !value.is_empty() {
                    value.push(',');
                }
                value.push_str(&clean_value(v));
            }
            btmap.insert(key, value);
        }

        btmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_value_borrowed_when_untouched() {
        let result = clean_value("  text/plain ");
        assert_eq!(result, "text/plain");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_clean_value_strips_newlines() {
        let result = clean_value(" folded\n value\n");
        assert_eq!(result, "folded value");
        assert!(matches!(result, Cow::Owned(_)));
    }

    #[test]
    fn test_add_appends_values() {
        let mut headers = Multimap::new();
        headers.add("X-Amz-Meta-Tag", "one");
        headers.add("X-Amz-Meta-Tag", "two");
        assert_eq!(headers.get_vec("X-Amz-Meta-Tag").unwrap(), &vec!["one", "two"]);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut headers = Multimap::new();
        headers.add("Content-Type", "image/jpeg");
        assert!(headers.contains_key_ignore_case("content-type"));
        assert!(headers.contains_key_ignore_case("CONTENT-TYPE"));
        assert!(!headers.contains_key_ignore_case("content-md5"));
        assert_eq!(headers.get_all_ignore_case("content-TYPE"), vec!["image/jpeg"]);
    }

    #[test]
    fn test_add_meta_data() {
        let mut headers = Multimap::new();
        headers.add_meta_data("reviewedby", "joe@johnsmith.net");
        assert_eq!(
            headers.get("x-amz-meta-reviewedby").map(String::as_str),
            Some("joe@johnsmith.net")
        );
    }

    #[test]
    fn test_canonical_headers_select_and_join() {
        let mut headers = Multimap::new();
        headers.add("Date", "Tue, 27 Mar 2007 21:06:08 +0000");
        headers.add("User-Agent", "curl/7.15.5");
        headers.add("X-Amz-Meta-ReviewedBy", "joe@johnsmith.net");
        headers.add("X-Amz-Meta-ReviewedBy", "jane@johnsmith.net");
        headers.add("x-amz-acl", "public-read");

        let canonical = headers.get_canonical_headers();
        let keys: Vec<&str> = canonical.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["date", "x-amz-acl", "x-amz-meta-reviewedby"]);
        assert_eq!(
            canonical["x-amz-meta-reviewedby"],
            "joe@johnsmith.net,jane@johnsmith.net"
        );
    }

    #[test]
    fn test_canonical_headers_merge_casings() {
        let mut headers = Multimap::new();
        headers.add("X-Amz-Meta-A", "1");
        headers.add("x-amz-meta-a", "2");
        let canonical = headers.get_canonical_headers();
        assert_eq!(canonical.len(), 1);
        // "X-Amz-Meta-A" sorts before "x-amz-meta-a"
        assert_eq!(canonical["x-amz-meta-a"], "1,2");
    }

    #[test]
    fn test_to_query_string_encodes() {
        let mut query = Multimap::new();
        query.add("prefix", "photos/2007 march");
        assert_eq!(query.to_query_string(), "prefix=photos%2F2007%20march");
    }

    #[test]
    fn test_to_query_string_sorted_by_key() {
        let mut query = Multimap::new();
        query.add("prefix", "a");
        query.add("delimiter", "/");
        query.add("marker", "m");
        assert_eq!(query.to_query_string(), "delimiter=%2F&marker=m&prefix=a");
    }
}
