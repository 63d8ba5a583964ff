//! Swift to Kotlin type mapping.

use crate::kotlin::KotlinType;
use crate::swift::SwiftType;

/// Map a Swift type, or explain why it has no Kotlin counterpart.
pub fn kotlin_type(ty: &SwiftType) -> Result<KotlinType, String> {
    Ok(match ty {
        SwiftType::Named { name, generics } => {
            let short = name.strip_prefix("Swift.").unwrap_or(name);
            let mapped = match short {
                "Int8" => "Byte",
                "Int16" => "Short",
                "Int32" => "Int",
                "Int64" => "Long",
                "UInt8" => "UByte",
                "UInt16" => "UShort",
                "UInt32" => "UInt",
                "UInt64" => "ULong",
                "Bool" => "Boolean",
                "Character" => "Char",
                "Void" => "Unit",
                "AnyObject" => "Any",
                "Set" => "MutableSet",
                "Error" => "Exception",
                other => other,
            };
            let args = generics
                .iter()
                .map(kotlin_type)
                .collect::<Result<Vec<_>, _>>()?;
            KotlinType::generic(mapped, args)
        }
        SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrapped(inner) => {
            kotlin_type(inner)?.nullable()
        }
        SwiftType::Array(element) => KotlinType::generic("MutableList", vec![kotlin_type(element)?]),
        SwiftType::Dictionary { key, value } => {
            KotlinType::generic("MutableMap", vec![kotlin_type(key)?, kotlin_type(value)?])
        }
        SwiftType::Tuple(elements) => match elements.as_slice() {
            [] => KotlinType::named("Unit"),
            [first, second] => {
                KotlinType::generic("Pair", vec![kotlin_type(first)?, kotlin_type(second)?])
            }
            [first, second, third] => KotlinType::generic(
                "Triple",
                vec![kotlin_type(first)?, kotlin_type(second)?, kotlin_type(third)?],
            ),
            _ => {
                return Err(format!(
                    "tuples of {} elements have no standard Kotlin type",
                    elements.len()
                ));
            }
        },
        SwiftType::Function { params, result, .. } => KotlinType::Function {
            params: params
                .iter()
                .map(kotlin_type)
                .collect::<Result<Vec<_>, _>>()?,
            result: Box::new(kotlin_type(result)?),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swift::parse_type;

    fn map(text: &str) -> String {
        kotlin_type(&parse_type(text).unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(map("Int"), "Int");
        assert_eq!(map("Int64"), "Long");
        assert_eq!(map("Bool"), "Boolean");
        assert_eq!(map("Character"), "Char");
        assert_eq!(map("Void"), "Unit");
        assert_eq!(map("()"), "Unit");
        assert_eq!(map("AnyObject"), "Any");
        assert_eq!(map("Swift.Double"), "Double");
    }

    #[test]
    fn test_collections_and_optionals() {
        assert_eq!(map("[Int]"), "MutableList<Int>");
        assert_eq!(map("[String: [Bool]]"), "MutableMap<String, MutableList<Boolean>>");
        assert_eq!(map("Int?"), "Int?");
        assert_eq!(map("String!"), "String?");
        assert_eq!(map("Int??"), "Int?");
    }

    #[test]
    fn test_functions_and_tuples() {
        assert_eq!(map("(Int, String) -> Bool"), "(Int, String) -> Boolean");
        assert_eq!(map("(Int, Int)"), "Pair<Int, Int>");
        assert_eq!(map("(Int, Int, Int)"), "Triple<Int, Int, Int>");
        assert_eq!(map("((Int) -> Void)?"), "((Int) -> Unit)?");
    }

    #[test]
    fn test_large_tuple_is_untranslatable() {
        let ty = parse_type("(Int, Int, Int, Int)").unwrap();
        assert!(kotlin_type(&ty).is_err());
    }
}
