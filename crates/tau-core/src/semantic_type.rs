//! Semantic types assigned by the type checker.
//!
//! Types are `Copy` and borrow their payloads from the compilation arena, so
//! a type stored in an arena-resident annotation owns no heap memory.

use std::fmt;

use bumpalo::Bump;

/// The type of a declaration, expression or type annotation.
///
/// `PartialEq` is full structural equality. Most type rules only compare the
/// outer variant; use [`SemanticType::same_variant`] for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType<'ty> {
    /// Machine-word integer.
    Int,
    /// Boolean, represented as 0/1 at runtime.
    Bool,
    /// No value. Only valid as a return type.
    Void,
    /// Array of `element`, with a size when the declaration gave one.
    Array {
        /// Element type.
        element: &'ty SemanticType<'ty>,
        /// Declared element count.
        size: Option<usize>,
    },
    /// Function signature. Only ever the type of a function's symbol.
    Func {
        /// Parameter types in declaration order.
        params: &'ty [SemanticType<'ty>],
        /// Return type.
        ret: &'ty SemanticType<'ty>,
    },
}

impl<'ty> SemanticType<'ty> {
    /// Build an array type, placing the element type in `arena`.
    pub fn array(arena: &'ty Bump, element: SemanticType<'ty>, size: Option<usize>) -> Self {
        SemanticType::Array {
            element: arena.alloc(element),
            size,
        }
    }

    /// Build a function type, placing its parts in `arena`.
    pub fn func(arena: &'ty Bump, params: &[SemanticType<'ty>], ret: SemanticType<'ty>) -> Self {
        SemanticType::Func {
            params: arena.alloc_slice_copy(params),
            ret: arena.alloc(ret),
        }
    }

    /// Whether both types have the same outer variant, ignoring payloads.
    ///
    /// `[10]int` and `[]int` match; `int` and `bool` do not.
    pub fn same_variant(&self, other: &SemanticType<'_>) -> bool {
        matches!(
            (self, other),
            (SemanticType::Int, SemanticType::Int)
                | (SemanticType::Bool, SemanticType::Bool)
                | (SemanticType::Void, SemanticType::Void)
                | (SemanticType::Array { .. }, SemanticType::Array { .. })
                | (SemanticType::Func { .. }, SemanticType::Func { .. })
        )
    }

    pub fn is_int(&self) -> bool {
        matches!(self, SemanticType::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, SemanticType::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, SemanticType::Void)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SemanticType::Array { .. })
    }

    pub fn is_func(&self) -> bool {
        matches!(self, SemanticType::Func { .. })
    }

    /// Number of frame slots a variable of this type occupies in place.
    ///
    /// Sized arrays are stored inline; everything else, including unsized
    /// array parameters, takes one word.
    pub fn slot_count(&self) -> usize {
        match self {
            SemanticType::Array {
                size: Some(size), ..
            } => *size,
            _ => 1,
        }
    }
}

impl fmt::Display for SemanticType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Int => write!(f, "int"),
            SemanticType::Bool => write!(f, "bool"),
            SemanticType::Void => write!(f, "void"),
            SemanticType::Array { element, size } => match size {
                Some(size) => write!(f, "[{size}]{element}"),
                None => write!(f, "[]{element}"),
            },
            SemanticType::Func { params, ret } => {
                write!(f, "func(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "): {ret}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_match_by_variant_not_size() {
        let arena = Bump::new();
        let sized = SemanticType::array(&arena, SemanticType::Int, Some(10));
        let unsized_ = SemanticType::array(&arena, SemanticType::Int, None);
        assert!(sized.same_variant(&unsized_));
        assert_ne!(sized, unsized_);
        assert!(!sized.same_variant(&SemanticType::Int));
    }

    #[test]
    fn equality_is_structural_across_allocations() {
        let arena = Bump::new();
        let a = SemanticType::func(&arena, &[SemanticType::Int], SemanticType::Bool);
        let b = SemanticType::func(&arena, &[SemanticType::Int], SemanticType::Bool);
        let c = SemanticType::func(&arena, &[SemanticType::Bool], SemanticType::Bool);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.same_variant(&c));
    }

    #[test]
    fn slot_counts() {
        let arena = Bump::new();
        assert_eq!(SemanticType::Int.slot_count(), 1);
        assert_eq!(
            SemanticType::array(&arena, SemanticType::Int, Some(4)).slot_count(),
            4
        );
        assert_eq!(
            SemanticType::array(&arena, SemanticType::Int, None).slot_count(),
            1
        );
    }

    #[test]
    fn display_forms() {
        let arena = Bump::new();
        let f = SemanticType::func(
            &arena,
            &[
                SemanticType::Int,
                SemanticType::array(&arena, SemanticType::Int, None),
            ],
            SemanticType::Bool,
        );
        assert_eq!(f.to_string(), "func(int, []int): bool");
        assert_eq!(
            SemanticType::array(&arena, SemanticType::Int, Some(3)).to_string(),
            "[3]int"
        );
    }

    #[test]
    fn types_hold_no_heap_payload() {
        assert!(!std::mem::needs_drop::<SemanticType<'static>>());
    }
}
