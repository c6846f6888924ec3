extern crate url;

use self::url::Url;
use core::fmt;
use std::ops::Add;

const SEP: char = '/';

/// Backend endpoint under construction.
#[derive(Clone)]
pub struct Resource {
    url: Url,
}

impl Resource {
    #[must_use]
    pub fn new(uri: &str) -> Option<Resource> {
        let base = Url::parse(uri).ok()?;
        if base.cannot_be_a_base() {
            return None;
        }
        Some(Resource { url: base })
    }

    pub fn append_path(&mut self, path: &str) -> &mut Self {
        if let Some(segments) = self.url.path_segments() {
            let p = segments
                .chain(path.split(SEP))
                .filter(|x| !x.is_empty())
                .fold(String::new(), |s, x| {
                    let mut y = s.add(x);
                    y.push(SEP);
                    y
                });

            let path_to_set = if path.chars().next_back().unwrap_or_default() == SEP {
                &p
            } else {
                &p[..p.len().saturating_sub(1)]
            };
            self.url.set_path(path_to_set);
        } else {
            let r = self.url.join(path);
            if let Ok(u) = r {
                self.url = u;
            }
        }
        self
    }

    /// Appends a storage object path. Every segment is escaped so object
    /// names may carry characters that are meaningful in URLs.
    pub fn append_object_path(&mut self, object_path: &str) -> &mut Self {
        let escaped = object_path
            .split(SEP)
            .filter(|x| !x.is_empty())
            .map(|x| url_escape::encode_component(x).into_owned())
            .collect::<Vec<String>>()
            .join("/");
        self.append_path(&escaped)
    }

    pub fn query(&mut self, key: &str, value: &str) -> &mut Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_correct_some() {
        // Arrange

        // Act
        let r = Resource::new("http://localhost");

        // Assert
        assert!(r.is_some());
    }

    #[test]
    fn new_incorrect_none() {
        // Arrange

        // Act
        let r = Resource::new("http/localhost");

        // Assert
        assert!(r.is_none());
    }

    #[rstest]
    #[case("http://localhost", "x", "http://localhost/x")]
    #[case("http://localhost", "/x/", "http://localhost/x/")]
    #[case("http://localhost/", "x/y", "http://localhost/x/y")]
    #[case("http://localhost/x", "/y", "http://localhost/x/y")]
    #[case("http://localhost/x/", "y/", "http://localhost/x/y/")]
    #[case(
        "https://xyz.supabase.co",
        "/rest/v1/files",
        "https://xyz.supabase.co/rest/v1/files"
    )]
    #[case(
        "https://xyz.supabase.co/",
        "storage/v1/object/list/user-files",
        "https://xyz.supabase.co/storage/v1/object/list/user-files"
    )]
    #[trace]
    fn append_path_tests(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        // Arrange
        let mut r = Resource::new(base).unwrap();

        // Act
        r.append_path(path);

        // Assert
        assert_eq!(r.to_string().as_str(), expected);
    }

    #[test]
    fn append_path_twice() {
        // Arrange
        let mut r = Resource::new("http://localhost").unwrap();

        // Act
        r.append_path("x").append_path("y");

        // Assert
        assert_eq!(r.to_string().as_str(), "http://localhost/x/y");
    }

    #[rstest]
    #[case("u1/1700000000_photo.png", "http://localhost/o/u1/1700000000_photo.png")]
    #[case("u1/my report.pdf", "http://localhost/o/u1/my%20report.pdf")]
    #[case("u1/a?b#c.txt", "http://localhost/o/u1/a%3Fb%23c.txt")]
    #[trace]
    fn append_object_path_escapes(#[case] object: &str, #[case] expected: &str) {
        // Arrange
        let mut r = Resource::new("http://localhost").unwrap();

        // Act
        r.append_path("o").append_object_path(object);

        // Assert
        assert_eq!(r.to_string().as_str(), expected);
    }

    #[test]
    fn query_pairs_appended() {
        // Arrange
        let mut r = Resource::new("http://localhost/rest/v1/files").unwrap();

        // Act
        r.query("select", "*").query("order", "created_at.desc");

        // Assert
        assert_eq!(
            r.to_string().as_str(),
            "http://localhost/rest/v1/files?select=*&order=created_at.desc"
        );
    }
}
