//! A value that is one of two types.
//!
//! `Result` covers the success/failure case. `Either` is for the cases where
//! neither side is an error, or where both sides are gathered, e.g. running
//! independent checks and keeping all outcomes.

/// Either a `Left(L)` or a `Right(R)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    /// `Right` when `right` holds a value, otherwise `Left(left())`.
    pub fn from_option(left: impl FnOnce() -> L, right: Option<R>) -> Self {
        match right {
            Some(value) => Either::Right(value),
            None => Either::Left(left()),
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(value) => Some(value),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(value) => Some(value),
        }
    }

    pub fn as_ref(&self) -> Either<&L, &R> {
        match self {
            Either::Left(value) => Either::Left(value),
            Either::Right(value) => Either::Right(value),
        }
    }

    /// Collapse both sides into one type.
    pub fn fold<T>(self, on_left: impl FnOnce(L) -> T, on_right: impl FnOnce(R) -> T) -> T {
        match self {
            Either::Left(value) => on_left(value),
            Either::Right(value) => on_right(value),
        }
    }

    pub fn map<T, U>(
        self,
        on_left: impl FnOnce(L) -> T,
        on_right: impl FnOnce(R) -> U,
    ) -> Either<T, U> {
        match self {
            Either::Left(value) => Either::Left(on_left(value)),
            Either::Right(value) => Either::Right(on_right(value)),
        }
    }

    pub fn map_left<T>(self, f: impl FnOnce(L) -> T) -> Either<T, R> {
        self.map(f, |r| r)
    }

    pub fn map_right<U>(self, f: impl FnOnce(R) -> U) -> Either<L, U> {
        self.map(|l| l, f)
    }

    pub fn flat_map<T, U>(
        self,
        on_left: impl FnOnce(L) -> Either<T, U>,
        on_right: impl FnOnce(R) -> Either<T, U>,
    ) -> Either<T, U> {
        self.fold(on_left, on_right)
    }

    pub fn flat_map_left<T>(self, f: impl FnOnce(L) -> Either<T, R>) -> Either<T, R> {
        self.fold(f, Either::Right)
    }

    pub fn flat_map_right<U>(self, f: impl FnOnce(R) -> Either<L, U>) -> Either<L, U> {
        self.fold(Either::Left, f)
    }

    /// Run the side effect matching the held value.
    pub fn run(self, on_left: impl FnOnce(L), on_right: impl FnOnce(R)) {
        self.fold(on_left, on_right);
    }

    /// The left value, or the error built from the right one.
    pub fn left_or_else<E>(self, f: impl FnOnce(R) -> E) -> Result<L, E> {
        match self {
            Either::Left(value) => Ok(value),
            Either::Right(value) => Err(f(value)),
        }
    }

    /// The right value, or the error built from the left one.
    pub fn right_or_else<E>(self, f: impl FnOnce(L) -> E) -> Result<R, E> {
        match self {
            Either::Left(value) => Err(f(value)),
            Either::Right(value) => Ok(value),
        }
    }

    /// Right-biased view: `Right` is `Ok`.
    pub fn into_result(self) -> Result<R, L> {
        self.right_or_else(|l| l)
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Either::Right(value),
            Err(value) => Either::Left(value),
        }
    }
}

fn partition<L, R>(iter: impl IntoIterator<Item = Either<L, R>>) -> (Vec<L>, Vec<R>) {
    let mut lefts = Vec::new();
    let mut rights = Vec::new();
    for item in iter {
        item.run(|l| lefts.push(l), |r| rights.push(r));
    }
    (lefts, rights)
}

/// Gather every item; any left wins.
///
/// Yields `Left(lefts)` when at least one left was seen or nothing was seen
/// at all, and `Right(rights)` otherwise.
pub fn collect_left_biased<L, R>(
    iter: impl IntoIterator<Item = Either<L, R>>,
) -> Either<Vec<L>, Vec<R>> {
    let (lefts, rights) = partition(iter);
    if !lefts.is_empty() || rights.is_empty() {
        Either::Left(lefts)
    } else {
        Either::Right(rights)
    }
}

/// Gather every item; any right wins.
///
/// Yields `Right(rights)` when at least one right was seen or nothing was
/// seen at all, and `Left(lefts)` otherwise.
pub fn collect_right_biased<L, R>(
    iter: impl IntoIterator<Item = Either<L, R>>,
) -> Either<Vec<L>, Vec<R>> {
    let (lefts, rights) = partition(iter);
    if !rights.is_empty() || lefts.is_empty() {
        Either::Right(rights)
    } else {
        Either::Left(lefts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type E = Either<&'static str, i32>;

    #[test]
    fn from_option_prefers_present_right() {
        let mut called = false;
        let e: E = Either::from_option(
            || {
                called = true;
                "missing"
            },
            Some(3),
        );
        assert_eq!(e, Either::Right(3));
        assert!(!called);

        let e: E = Either::from_option(|| "missing", None);
        assert_eq!(e, Either::Left("missing"));
    }

    #[test]
    fn accessors() {
        let l: E = Either::Left("a");
        let r: E = Either::Right(1);
        assert!(l.is_left() && !l.is_right());
        assert!(r.is_right() && !r.is_left());
        assert_eq!(l.left(), Some("a"));
        assert_eq!(l.right(), None);
        assert_eq!(r.right(), Some(1));
        assert_eq!(r.as_ref(), Either::Right(&1));
    }

    #[test]
    fn fold_and_map_touch_only_the_held_side() {
        let l: E = Either::Left("abc");
        let r: E = Either::Right(4);

        assert_eq!(l.fold(str::len, |n| n as usize), 3);
        assert_eq!(r.fold(str::len, |n| n as usize), 4);

        assert_eq!(l.map_left(str::len), Either::Left(3));
        assert_eq!(l.map_right(|n| n * 2), Either::Left("abc"));
        assert_eq!(r.map_right(|n| n * 2), Either::Right(8));
        assert_eq!(r.map(str::len, |n| n + 1), Either::Right(5));
    }

    #[test]
    fn flat_maps_can_switch_sides() {
        let r: E = Either::Right(-1);
        let checked = r.flat_map_right(|n| if n < 0 { Either::Left("negative") } else { Either::Right(n) });
        assert_eq!(checked, Either::Left("negative"));

        let l: E = Either::Left("7");
        let parsed: Either<&str, i32> =
            l.flat_map_left(|s| s.parse().map_or(Either::Left(s), Either::Right));
        assert_eq!(parsed, Either::Right(7));

        let unchanged: Either<usize, i32> = Either::<&str, i32>::Right(2)
            .flat_map(|s| Either::Left(s.len()), |n| Either::Right(n * 10));
        assert_eq!(unchanged, Either::Right(20));
    }

    #[test]
    fn run_invokes_one_side() {
        let mut lefts = Vec::new();
        let mut rights = Vec::new();
        let l: E = Either::Left("x");
        l.run(|s| lefts.push(s), |n| rights.push(n));
        assert_eq!(lefts, vec!["x"]);
        assert!(rights.is_empty());
    }

    #[test]
    fn or_else_accessors_build_errors_from_other_side() {
        let l: E = Either::Left("a");
        let r: E = Either::Right(9);

        assert_eq!(l.left_or_else(|n| n * 2), Ok("a"));
        assert_eq!(r.left_or_else(|n| n * 2), Err(18));
        assert_eq!(r.right_or_else(str::len), Ok(9));
        assert_eq!(l.right_or_else(str::len), Err(1));
    }

    #[test]
    fn result_conversions() {
        let ok: Result<i32, &str> = Ok(1);
        let err: Result<i32, &str> = Err("bad");
        assert_eq!(Either::from(ok), Either::Right(1));
        assert_eq!(Either::from(err), Either::Left("bad"));
        assert_eq!(Either::<&str, i32>::Left("bad").into_result(), Err("bad"));
    }

    #[test]
    fn left_biased_collection() {
        let mixed: Vec<E> = vec![Either::Right(1), Either::Left("a"), Either::Right(2)];
        assert_eq!(collect_left_biased(mixed), Either::Left(vec!["a"]));

        let rights: Vec<E> = vec![Either::Right(1), Either::Right(2)];
        assert_eq!(collect_left_biased(rights), Either::Right(vec![1, 2]));

        let empty: Vec<E> = Vec::new();
        assert_eq!(collect_left_biased(empty), Either::Left(vec![]));
    }

    #[test]
    fn right_biased_collection() {
        let mixed: Vec<E> = vec![Either::Left("a"), Either::Right(1), Either::Left("b")];
        assert_eq!(collect_right_biased(mixed), Either::Right(vec![1]));

        let lefts: Vec<E> = vec![Either::Left("a"), Either::Left("b")];
        assert_eq!(collect_right_biased(lefts), Either::Left(vec!["a", "b"]));

        let empty: Vec<E> = Vec::new();
        assert_eq!(collect_right_biased(empty), Either::Right(vec![]));
    }
}
