//! Key-file store — an INI-like database of `[group]` sections holding
//! `key=value` lines

/// Mapping from group to key/value pairs.
///
/// Groups and the keys within them keep first-insertion order; setting an
/// existing (group, key) overwrites the value in place.
#[derive(Debug, Default)]
pub struct KeyFile {
    groups: Vec<Group>,
}

#[derive(Debug)]
struct Group {
    name: String,
    entries: Vec<(String, String)>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Set `group.key = value`, overwriting an existing value.
    pub fn set_value(&mut self, group: &str, key: &str, value: &str) {
        let index = match self.groups.iter().position(|g| g.name == group) {
            Some(index) => index,
            None => {
                self.groups.push(Group {
                    name: group.to_string(),
                    entries: Vec::new(),
                });
                self.groups.len() - 1
            }
        };

        let entries = &mut self.groups[index].entries;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Group names in insertion order.
    pub fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Keys of `group` in insertion order; empty if the group is absent.
    pub fn keys(&self, group: &str) -> Vec<&str> {
        self.groups
            .iter()
            .find(|g| g.name == group)
            .map(|g| g.entries.iter().map(|(k, _)| k.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn value(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == group)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serialise to text: a `[group]` header followed by its `key=value`
    /// lines, groups separated by a blank line. Empty store serialises to
    /// an empty string.
    pub fn to_data(&self) -> String {
        let mut out = String::new();
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&group.name);
            out.push_str("]\n");
            for (key, value) in &group.entries {
                out.push_str(key);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut kf = KeyFile::new();
        kf.set_value("org/gnome/desktop/session", "idle-delay", "300");

        assert_eq!(kf.value("org/gnome/desktop/session", "idle-delay"), Some("300"));
        assert_eq!(kf.value("org/gnome/desktop/session", "missing"), None);
        assert_eq!(kf.value("missing/group", "idle-delay"), None);
    }

    #[test]
    fn test_groups_keep_insertion_order() {
        let mut kf = KeyFile::new();
        kf.set_value("zebra", "k", "1");
        kf.set_value("alpha", "k", "2");
        kf.set_value("middle", "k", "3");

        assert_eq!(kf.groups(), vec!["zebra", "alpha", "middle"]);
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut kf = KeyFile::new();
        kf.set_value("g", "zz", "1");
        kf.set_value("g", "aa", "2");

        assert_eq!(kf.keys("g"), vec!["zz", "aa"]);
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut kf = KeyFile::new();
        kf.set_value("g", "a", "first");
        kf.set_value("g", "b", "other");
        kf.set_value("g", "a", "second");

        assert_eq!(kf.value("g", "a"), Some("second"));
        // Overwriting must not move the key to the end.
        assert_eq!(kf.keys("g"), vec!["a", "b"]);
    }

    #[test]
    fn test_to_data_single_group() {
        let mut kf = KeyFile::new();
        kf.set_value("org/gnome/desktop/background", "picture-uri", "'file:///a.png'");

        assert_eq!(
            kf.to_data(),
            "[org/gnome/desktop/background]\npicture-uri='file:///a.png'\n"
        );
    }

    #[test]
    fn test_to_data_multiple_groups() {
        let mut kf = KeyFile::new();
        kf.set_value("one", "a", "1");
        kf.set_value("one", "b", "2");
        kf.set_value("two", "c", "3");

        assert_eq!(kf.to_data(), "[one]\na=1\nb=2\n\n[two]\nc=3\n");
    }

    #[test]
    fn test_to_data_empty() {
        assert_eq!(KeyFile::new().to_data(), "");
        assert!(KeyFile::new().is_empty());
    }

    #[test]
    fn test_keys_of_missing_group() {
        let kf = KeyFile::new();
        assert!(kf.keys("nope").is_empty());
    }
}
