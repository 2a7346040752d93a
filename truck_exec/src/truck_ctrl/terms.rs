//! Linguistic terms of the controller variables

crate::fuzzy_terms! {
    /// Terms of the lateral position, used by both matrices.
    pub enum PositionTerm {
        LeftBig => "LeftBig",
        LeftMedium => "LeftMedium",
        Centred => "Centred",
        RightMedium => "RightMedium",
        RightBig => "RightBig",
    }
}

crate::fuzzy_terms! {
    /// Terms of the heading in free space.
    pub enum HeadingTerm {
        LargeBelow90 => "LargeBelow90",
        MediumBelow90 => "MediumBelow90",
        SmallBelow90 => "SmallBelow90",
        At90 => "At90",
        SmallAbove90 => "SmallAbove90",
        MediumAbove90 => "MediumAbove90",
        LargeAbove90 => "LargeAbove90",
    }
}

crate::fuzzy_terms! {
    /// Terms of the heading when avoiding an obstacle.
    pub enum AvoidHeadingTerm {
        MediumBelow90 => "MediumBelow90",
        SmallBelow90 => "SmallBelow90",
        At90 => "At90",
        SmallAbove90 => "SmallAbove90",
        MediumAbove90 => "MediumAbove90",
    }
}

crate::fuzzy_terms! {
    /// Terms of the heading change output.
    pub enum SteerTerm {
        NegativeBig => "NB",
        NegativeMedium => "NM",
        NegativeSmall => "NS",
        Zero => "ZE",
        PositiveSmall => "PS",
        PositiveMedium => "PM",
        PositiveBig => "PB",
    }
}
