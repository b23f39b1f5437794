//! Dispatch macros over the closed set of primitive types.
//!
//! Code that is generic over [`Element`](crate::Element) is reached from a
//! runtime [`PrimitiveType`](crate::PrimitiveType) through these macros, so
//! every match is exhaustive and adding a primitive is a compile error until
//! each call site handles it.

/// Runs `$body` with the type alias `$T` bound to the Rust element type of `$ty`.
macro_rules! with_element_type {
    ($ty:expr, $T:ident => $body:expr) => {
        match $ty {
            $crate::PrimitiveType::I8 => {
                type $T = i8;
                $body
            }
            $crate::PrimitiveType::I16 => {
                type $T = i16;
                $body
            }
            $crate::PrimitiveType::I32 => {
                type $T = i32;
                $body
            }
            $crate::PrimitiveType::I64 => {
                type $T = i64;
                $body
            }
            $crate::PrimitiveType::U8 => {
                type $T = u8;
                $body
            }
            $crate::PrimitiveType::U16 => {
                type $T = u16;
                $body
            }
            $crate::PrimitiveType::U32 => {
                type $T = u32;
                $body
            }
            $crate::PrimitiveType::U64 => {
                type $T = u64;
                $body
            }
            $crate::PrimitiveType::F32 => {
                type $T = f32;
                $body
            }
            $crate::PrimitiveType::F64 => {
                type $T = f64;
                $body
            }
            $crate::PrimitiveType::Bool => {
                type $T = bool;
                $body
            }
        }
    };
}

/// Binds `$inner` to the typed payload of a [`Scalar`](crate::Scalar) or an
/// [`Array`](crate::Array) and evaluates `$body` for whichever variant is present.
macro_rules! match_variants {
    ($kind:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $crate::$kind::I8($inner) => $body,
            $crate::$kind::I16($inner) => $body,
            $crate::$kind::I32($inner) => $body,
            $crate::$kind::I64($inner) => $body,
            $crate::$kind::U8($inner) => $body,
            $crate::$kind::U16($inner) => $body,
            $crate::$kind::U32($inner) => $body,
            $crate::$kind::U64($inner) => $body,
            $crate::$kind::F32($inner) => $body,
            $crate::$kind::F64($inner) => $body,
            $crate::$kind::Bool($inner) => $body,
        }
    };
}
