use crate::types::Track;

/// Decides whether two tracks are the same song.
///
/// The same recording is published under different ids on singles, albums
/// and compilations, so beyond an id match two tracks are also equivalent
/// when they credit the same artists (compared as multisets, order ignored)
/// and their names are identical, case included.
pub fn are_equivalent(a: &Track, b: &Track) -> bool {
    if a.id == b.id {
        return true;
    }

    if a.name != b.name || a.artists.len() != b.artists.len() {
        return false;
    }

    let mut left: Vec<&str> = a.artists.iter().map(|x| x.id.as_str()).collect();
    let mut right: Vec<&str> = b.artists.iter().map(|x| x.id.as_str()).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Whether any track in `known` is equivalent to `track`.
pub fn is_known(track: &Track, known: &[Track]) -> bool {
    known.iter().any(|k| are_equivalent(track, k))
}
