/// Describes on which side of a directed line a point lies.
///
/// Created by [side_query](crate::side_query) and [EdgeEntry::side_query](super::EdgeEntry::side_query).
/// "Left" refers to the counterclockwise side of the line in a right handed coordinate system.
#[derive(Debug, Clone, Copy)]
pub struct LineSideInfo {
    signed_side: f64,
}

impl PartialEq for LineSideInfo {
    fn eq(&self, other: &LineSideInfo) -> bool {
        if self.is_on_line() || other.is_on_line() {
            self.is_on_line() && other.is_on_line()
        } else {
            self.is_on_right_side() == other.is_on_right_side()
        }
    }
}

impl LineSideInfo {
    #[inline]
    pub(crate) fn from_determinant(s: f64) -> LineSideInfo {
        LineSideInfo { signed_side: s }
    }

    /// Returns `true` if the point lies strictly left of the line.
    pub fn is_on_left_side(&self) -> bool {
        self.signed_side > 0.0
    }

    /// Returns `true` if the point lies strictly right of the line.
    pub fn is_on_right_side(&self) -> bool {
        self.signed_side < 0.0
    }

    /// Returns `true` if the point lies left of the line or exactly on it.
    pub fn is_on_left_side_or_on_line(&self) -> bool {
        self.signed_side >= 0.0
    }

    /// Returns `true` if the point lies exactly on the line.
    #[inline]
    pub fn is_on_line(self) -> bool {
        self.signed_side == 0.0
    }

    /// Returns `true` if both queried points lie strictly on the same side of the line.
    pub fn is_on_same_side_as(self, other: LineSideInfo) -> bool {
        !self.is_on_line() && self == other
    }

    /// Returns the opposite of this `LineSideInfo`.
    pub fn reversed(self) -> LineSideInfo {
        LineSideInfo {
            signed_side: -self.signed_side,
        }
    }
}

#[cfg(test)]
mod test {
    use super::LineSideInfo;

    #[test]
    fn test_line_side_info() {
        let left = LineSideInfo::from_determinant(2.0);
        let right = LineSideInfo::from_determinant(-0.5);
        let on_line = LineSideInfo::from_determinant(0.0);

        assert!(left.is_on_left_side());
        assert!(right.is_on_right_side());
        assert!(on_line.is_on_line());
        assert!(on_line.is_on_left_side_or_on_line());
        assert_eq!(left.reversed(), right);
        assert!(left.is_on_same_side_as(LineSideInfo::from_determinant(1.0)));
        assert!(!left.is_on_same_side_as(right));
        assert!(!on_line.is_on_same_side_as(on_line));
    }
}
