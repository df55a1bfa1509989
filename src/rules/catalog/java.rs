//! Java rules, identified by SpotBugs bug pattern names

use lazy_static::lazy_static;
use regex::Regex;

use super::Rule;
use crate::rules::matchers::{BlockReport, FieldCheck, Flow, Matcher, TypeCheck};
use crate::rules::results::{Confidence, Severity};
use crate::source::Language;

/// Use templates that release or hand off a resource bound to `{name}`
const RESOURCE_RELEASED: &str = r"\b{name}\s*\.\s*close\s*\(|\breturn\b[^;]*\b{name}\b|[(,]\s*{name}\s*[),]|=\s*{name}\s*;";

/// Private, non-final field declaration
const PRIVATE_FIELD: &str = r"^\s*private\s+(?:static\s+)?(?:volatile\s+|transient\s+)?[\w.]+(?:<[^;=]*>)?(?:\[\])*\s+(?P<name>\w+)\s*(?:;|(?P<init>=))";

/// Private instance field holding an array or a mutable date
const MUTABLE_FIELD: &str = r"^\s*private\s+(?:final\s+)?(?:transient\s+|volatile\s+)?(?:[\w.]+(?:<[^;=]*>)?(?:\s*\[\s*\])+|(?:java\s*\.\s*util\s*\.\s*)?(?:Date|Calendar|GregorianCalendar))\s+(?P<name>\w+)\s*[;=]";

/// Types whose instances are mutable and shared by reference
const MUTABLE_TYPES: [&str; 4] = ["[]", "Date", "Calendar", "GregorianCalendar"];

/// Boxed primitives that parse strings
const BOXED_PARSERS: &str = "Integer|Long|Short|Byte|Float|Double|Boolean";

/// Final library types that are never equal to one another
const VALUE_TYPES: [&str; 12] = [
    "String",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Character",
    "Boolean",
    "BigDecimal",
    "BigInteger",
    "Date",
];

fn type_names(types: &[&str]) -> Vec<String> {
    types.iter().map(|t| t.to_string()).collect()
}

lazy_static! {
    /// Built-in Java rules
    pub static ref JAVA_RULES: Vec<Rule> = vec![
        Rule::new(
            "NP_NULL_ON_SOME_PATH",
            "null_on_some_path",
            "correctness",
            Severity::Warning,
            Matcher::Flow(
                Flow::new(
                    Regex::new(r"\bif\s*\(\s*(?P<name>\w+)\s*==\s*null\s*\)").unwrap(),
                    r"\b{name}\s*\.\s*\w+\s*\(",
                )
                .with_kill(r"\breturn\b|\bthrow\b|\belse\b|\b{name}\s*=[^=]"),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible null pointer dereference")
        .with_description("The value is compared with null and then dereferenced on a path where the null case was not handled")
        .with_remediation("Return, throw or assign a value in the null branch before dereferencing"),

        Rule::new(
            "NP_ALWAYS_NULL",
            "always_null",
            "correctness",
            Severity::Critical,
            Matcher::Flow(
                Flow::new(
                    Regex::new(r"\b(?P<name>\w+)\s*=\s*null\s*;").unwrap(),
                    r"\b{name}\s*\.\s*\w+",
                )
                .with_kill(r"\b{name}\s*=[^=]"),
            ),
        )
        .with_message("Null pointer dereference")
        .with_remediation("Assign a non-null value before use"),

        Rule::new(
            "RCN_REDUNDANT_NULLCHECK_OF_NONNULL_VALUE",
            "redundant_nullcheck",
            "style",
            Severity::Info,
            Matcher::Flow(
                Flow::new(
                    Regex::new(r#"\b[A-Z]\w*\s+(?P<name>\w+)\s*=\s*(?:"|new\s+\w)"#).unwrap(),
                    r"\b{name}\s*[!=]=\s*null\b|\bnull\s*[!=]=\s*{name}\b",
                )
                .with_kill(r"\b{name}\s*=[^=]"),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Redundant null check of value known to be non-null")
        .with_remediation("Remove the null check"),

        Rule::new(
            "EC_UNRELATED_TYPES",
            "unrelated_types_equals",
            "correctness",
            Severity::Warning,
            Matcher::Typed {
                regex: Regex::new(r#"\b(?P<lhs>[A-Za-z_]\w*)\s*\.\s*equals\s*\(\s*(?P<rhs>[A-Za-z_]\w*|"[^"]*"|\d[\w.]*)\s*\)"#)
                    .unwrap(),
                check: TypeCheck::Unrelated(type_names(&VALUE_TYPES)),
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Call to equals() comparing unrelated types")
        .with_description("Objects of unrelated final types are never equal, so the call always returns false")
        .with_remediation("Convert one side so both operands have the same type"),

        Rule::new(
            "ES_COMPARING_STRINGS_WITH_EQ",
            "string_reference_equality",
            "correctness",
            Severity::Warning,
            Matcher::TypedComparison {
                types: vec!["String".to_string()],
            },
        )
        .with_message("Comparison of String objects using == or !=")
        .with_remediation("Compare strings with equals()"),

        Rule::new(
            "FE_FLOATING_POINT_EQUALITY",
            "floating_point_equality",
            "correctness",
            Severity::Warning,
            Matcher::TypedComparison {
                types: ["double", "float", "Double", "Float"]
                    .iter()
                    .map(|t| t.to_string())
                    .collect(),
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Test for floating point equality")
        .with_remediation("Compare with a tolerance: Math.abs(a - b) < epsilon"),

        Rule::new(
            "HE_EQUALS_NO_HASHCODE",
            "equals_no_hashcode",
            "correctness",
            Severity::Warning,
            Matcher::Block {
                header: Regex::new(r"\bclass\s+\w+").unwrap(),
                contains: Some(Regex::new(r"\bboolean\s+equals\s*\(\s*(?:final\s+)?Object\b").unwrap()),
                lacks: Some(Regex::new(r"\bint\s+hashCode\s*\(\s*\)").unwrap()),
                report: BlockReport::Header,
            },
        )
        .with_message("Class defines equals() but not hashCode()")
        .with_description("Equal objects must have equal hash codes or hash-based collections misbehave")
        .with_remediation("Override hashCode() alongside equals()"),

        Rule::new(
            "SE_NO_SERIALVERSIONID",
            "no_serialversionid",
            "style",
            Severity::Info,
            Matcher::Block {
                header: Regex::new(r"\bclass\s+\w+[^{;]*\bimplements\b[^{;]*\bSerializable\b").unwrap(),
                contains: None,
                lacks: Some(Regex::new(r"\bserialVersionUID\b").unwrap()),
                report: BlockReport::Header,
            },
        )
        .with_message("Class is Serializable, but doesn't define serialVersionUID")
        .with_remediation("Declare private static final long serialVersionUID"),

        Rule::new(
            "SE_BAD_FIELD",
            "non_serializable_field",
            "correctness",
            Severity::Warning,
            Matcher::Block {
                header: Regex::new(r"\bclass\s+\w+[^{;]*\bimplements\b[^{;]*\bSerializable\b").unwrap(),
                contains: Some(
                    Regex::new(r"^\s*(?:(?:private|protected|public|final)\s+)*(?P<at>(?:java\s*\.\s*\w+\s*\.\s*)*(?:Thread|Socket|ServerSocket|Connection|Statement|PreparedStatement|ResultSet|InputStream|OutputStream|Reader|Writer|Logger|Lock|ReentrantLock|ExecutorService))\s+\w+\s*[;=]")
                        .unwrap(),
                ),
                lacks: None,
                report: BlockReport::Contains,
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Non-transient non-serializable instance field in serializable class")
        .with_remediation("Mark the field transient or store a serializable representation"),

        Rule::new(
            "EI_EXPOSE_REP",
            "expose_internal_representation",
            "style",
            Severity::Info,
            Matcher::Flow(Flow::new(
                Regex::new(MUTABLE_FIELD).unwrap(),
                r"\breturn\s+(?:this\s*\.\s*)?(?P<at>{name})\s*;",
            )),
        )
        .with_confidence(Confidence::Medium)
        .with_message("May expose internal representation by returning reference to mutable object")
        .with_remediation("Return a copy, or an unmodifiable view"),

        Rule::new(
            "EI_EXPOSE_REP2",
            "store_external_mutable_object",
            "style",
            Severity::Info,
            Matcher::Typed {
                regex: Regex::new(r"\bthis\s*\.\s*(?P<at>\w+)\s*=\s*(?P<operand>\w+)\s*;").unwrap(),
                check: TypeCheck::OneOf(type_names(&MUTABLE_TYPES)),
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("May expose internal representation by incorporating reference to mutable object")
        .with_remediation("Store a defensive copy of the argument"),

        Rule::new(
            "RV_RETURN_VALUE_IGNORED",
            "return_value_ignored",
            "correctness",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"^\s*(?P<at>[\w.]+)\s*\.\s*(?:toUpperCase|toLowerCase|trim|strip|stripLeading|stripTrailing|concat|substring|intern)\s*\([^;]*\)\s*;\s*$")
                    .unwrap(),
            ),
        )
        .with_message("Return value of method without side effect is ignored")
        .with_remediation("Assign the result; strings are immutable"),

        Rule::new(
            "RV_RETURN_VALUE_IGNORED_BAD_PRACTICE",
            "exceptional_return_value_ignored",
            "errors",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"^\s*(?P<at>[\w.]+)\s*\.\s*(?:delete|mkdirs?|createNewFile|renameTo|setLastModified|setReadOnly|setWritable|setExecutable)\s*\([^;]*\)\s*;\s*$")
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Method ignores exceptional return value")
        .with_remediation("Check the boolean result, or use java.nio.file.Files which throws on failure"),

        Rule::new(
            "DM_DEFAULT_ENCODING",
            "default_encoding",
            "correctness",
            Severity::Info,
            Matcher::code_unless(
                Regex::new(r"\bnew\s+(?:FileReader|FileWriter|InputStreamReader|OutputStreamWriter|PrintStream)\s*\(|\.\s*getBytes\s*\(\s*\)")
                    .unwrap(),
                Regex::new(r"(?i)charset|utf-?_?8").unwrap(),
            ),
        )
        .with_message("Reliance on default encoding")
        .with_remediation("Pass an explicit charset such as StandardCharsets.UTF_8"),

        Rule::new(
            "DM_NUMBER_CTOR",
            "number_ctor",
            "performance",
            Severity::Info,
            Matcher::Typed {
                regex: Regex::new(r"\bnew\s+(?:Integer|Long|Short|Byte|Character|Float|Double|Boolean)\s*\(\s*(?P<operand>[^)]*)\)")
                    .unwrap(),
                check: TypeCheck::NoneOf(type_names(&["String"])),
            },
        )
        .with_message("Method invokes inefficient Number constructor; use static valueOf instead")
        .with_remediation("Use valueOf()"),

        Rule::new(
            "DM_BOXED_PRIMITIVE_FOR_PARSING",
            "boxed_primitive_for_parsing",
            "performance",
            Severity::Info,
            Matcher::Any(vec![
                Matcher::Typed {
                    regex: Regex::new(&format!(
                        r"\bnew\s+(?P<at>{BOXED_PARSERS})\s*\(\s*(?P<operand>[^)]*)\)"
                    ))
                    .unwrap(),
                    check: TypeCheck::OneOf(type_names(&["String"])),
                },
                Matcher::masked(
                    Regex::new(&format!(
                        r"\b(?:{BOXED_PARSERS})\s*\.\s*valueOf\s*\([^()]*\)\s*\.\s*(?:int|long|short|byte|float|double|boolean)Value\s*\(\s*\)"
                    ))
                    .unwrap(),
                ),
            ]),
        )
        .with_message("Boxing/unboxing to parse a primitive")
        .with_remediation("Use Integer.parseInt() and the other static parse methods"),

        Rule::new(
            "SQL_NONCONSTANT_STRING_PASSED_TO_EXECUTE",
            "sql_nonconstant_string",
            "injection",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r#"\.\s*(?:execute(?:Query|Update|LargeUpdate)?|addBatch|prepareStatement|prepareCall)\s*\([^;]*(?:"\s*\+|\+\s*"|\bString\s*\.\s*format\s*\()"#)
                    .unwrap(),
            ),
        )
        .with_message("Nonconstant string passed to execute or addBatch method on an SQL statement")
        .with_remediation("Use a PreparedStatement with bound parameters"),

        Rule::new(
            "STCAL_STATIC_SIMPLE_DATE_FORMAT_INSTANCE",
            "static_date_format",
            "concurrency",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\bstatic\b[^;(=]*\b(?:SimpleDateFormat|DateFormat|Calendar|GregorianCalendar)\s+(?P<at>\w+)\s*[=;]")
                    .unwrap(),
            ),
        )
        .with_message("Static Calendar or DateFormat instance is not thread safe")
        .with_remediation("Use java.time.format.DateTimeFormatter or a ThreadLocal instance"),

        Rule::new(
            "STCAL_INVOKE_ON_STATIC_DATE_FORMAT_INSTANCE",
            "invoke_static_date_format",
            "concurrency",
            Severity::Warning,
            Matcher::Flow(Flow::new(
                Regex::new(r"\bstatic\b[^;(=]*\b(?:SimpleDateFormat|DateFormat|Calendar|GregorianCalendar)\s+(?P<name>\w+)\s*[=;]")
                    .unwrap(),
                r"\b(?P<at>{name})\s*\.\s*(?:format|parse|setTimeZone|setTime|getTime|get|set|add)\s*\(",
            )),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Call to method of static Calendar or DateFormat")
        .with_remediation("Use java.time.format.DateTimeFormatter or a ThreadLocal instance"),

        Rule::new(
            "URF_UNREAD_FIELD",
            "unread_field",
            "style",
            Severity::Info,
            Matcher::Field {
                decl: Regex::new(PRIVATE_FIELD).unwrap(),
                exclude: Some(Regex::new(r"\bfinal\b").unwrap()),
                check: FieldCheck::Unread,
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Unread field")
        .with_remediation("Remove the field or use it"),

        Rule::new(
            "UWF_UNWRITTEN_FIELD",
            "unwritten_field",
            "correctness",
            Severity::Warning,
            Matcher::Field {
                decl: Regex::new(PRIVATE_FIELD).unwrap(),
                exclude: Some(Regex::new(r"\bfinal\b").unwrap()),
                check: FieldCheck::Unwritten,
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Unwritten field is read")
        .with_description("The field is never assigned, so every read sees the default value")
        .with_remediation("Initialise the field or remove it"),

        Rule::new(
            "IS2_INCONSISTENT_SYNC",
            "inconsistent_sync",
            "concurrency",
            Severity::Warning,
            Matcher::Field {
                decl: Regex::new(PRIVATE_FIELD).unwrap(),
                exclude: Some(Regex::new(r"\bfinal\b|\bvolatile\b").unwrap()),
                check: FieldCheck::InconsistentSync,
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Inconsistent synchronization")
        .with_description("The field is written while holding a lock but accessed elsewhere without it")
        .with_remediation("Guard every access with the same lock, or use an atomic type"),

        Rule::new(
            "DLS_DEAD_LOCAL_STORE",
            "dead_local_store",
            "style",
            Severity::Info,
            Matcher::Flow(
                Flow::new(
                    Regex::new(r"^\s*(?:final\s+)?(?:int|long|short|byte|char|float|double|boolean|String|var)\s+(?P<name>\w+)\s*=[^=;]+;")
                        .unwrap(),
                    r"^\s*(?P<at>{name})\s*=",
                )
                .with_kill(r"\b{name}\b|\{"),
            ),
        )
        .with_message("Dead store to local variable")
        .with_remediation("Drop the overwritten initial value"),

        Rule::new(
            "WA_NOT_IN_LOOP",
            "wait_not_in_loop",
            "concurrency",
            Severity::Warning,
            Matcher::Enclosed {
                regex: Regex::new(r"\bwait\s*\(\s*\d*\s*\)").unwrap(),
                enclosing: Regex::new(r"^\s*(?:\}\s*)?(?:while|for|do)\b").unwrap(),
                negate: true,
            },
        )
        .with_message("Wait not in loop")
        .with_description("Spurious wakeups and racing notifiers mean the condition must be rechecked after waking")
        .with_remediation("Call wait() inside a while loop that checks the condition"),

        Rule::new(
            "NN_NAKED_NOTIFY",
            "naked_notify",
            "concurrency",
            Severity::Warning,
            Matcher::Block {
                header: Regex::new(r"\bsynchronized\b[^;]*\{\s*$").unwrap(),
                contains: Some(Regex::new(r"\bnotify(?:All)?\s*\(\s*\)").unwrap()),
                lacks: Some(Regex::new(r"[^=!<>]=[^=]|\+\+|--").unwrap()),
                report: BlockReport::Contains,
            },
        )
        .with_confidence(Confidence::Medium)
        .with_message("Naked notify")
        .with_remediation("Change the shared state the waiters check before notifying"),

        Rule::new(
            "DC_DOUBLECHECK",
            "double_check",
            "concurrency",
            Severity::Warning,
            Matcher::Flow(
                Flow::new(
                    Regex::new(r"\bif\s*\(\s*(?P<name>\w+)\s*==\s*null\s*\)").unwrap(),
                    r"^\s*(?P<at>if)\s*\(\s*{name}\s*==\s*null\s*\)",
                )
                .with_through(Regex::new(r"\bsynchronized\b").unwrap()),
            ),
        )
        .with_message("Possible double check of field")
        .with_remediation("Use a holder class or an eagerly initialised final field"),

        Rule::new(
            "DMI_RANDOM_USED_ONLY_ONCE",
            "random_used_only_once",
            "correctness",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"\bnew\s+(?:java\s*\.\s*util\s*\.\s*)?Random\s*\(\s*\)\s*\.\s*next\w*\s*\(").unwrap(),
            ),
        )
        .with_message("Random object created and used only once")
        .with_remediation("Keep one Random instance, or use ThreadLocalRandom.current()"),

        Rule::new(
            "ICAST_IDIV_CAST_TO_DOUBLE",
            "idiv_cast_to_double",
            "correctness",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\(\s*(?:double|float)\s*\)\s*\(\s*[\w.]+\s*/\s*[\w.]+\s*\)").unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Integral division result cast to double or float")
        .with_remediation("Cast an operand before dividing: (double) a / b"),

        Rule::new(
            "INT_BAD_REM_BY_1",
            "bad_rem_by_1",
            "correctness",
            Severity::Warning,
            Matcher::masked(Regex::new(r"%\s*1\s*[;)\],]").unwrap()),
        )
        .with_message("Integer remainder modulo 1")
        .with_remediation("x % 1 is always 0; check the intended divisor"),

        Rule::new(
            "BC_UNCONFIRMED_CAST",
            "unconfirmed_cast",
            "style",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"=\s*\(\s*(?P<at>[A-Z]\w*(?:<[^>]*>)?)\s*\)\s*\w+\s*;").unwrap(),
            ),
        )
        .with_confidence(Confidence::Low)
        .with_message("Unchecked/unconfirmed cast")
        .with_remediation("Check the type with instanceof before casting"),

        Rule::new(
            "OS_OPEN_STREAM",
            "open_stream",
            "resources",
            Severity::Warning,
            Matcher::Flow(Flow::missing(
                Regex::new(r"^\s*(?:final\s+)?[\w.<>]+\s+(?P<name>\w+)\s*=\s*new\s+(?:FileInputStream|FileOutputStream|FileReader|FileWriter|RandomAccessFile|ZipFile|JarFile)\s*\(")
                    .unwrap(),
                RESOURCE_RELEASED,
            )),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Method may fail to close stream")
        .with_remediation("Open the stream in a try-with-resources statement"),

        Rule::new(
            "ODR_OPEN_DATABASE_RESOURCE",
            "open_database_resource",
            "resources",
            Severity::Warning,
            Matcher::Flow(Flow::missing(
                Regex::new(r"^\s*(?:final\s+)?(?:java\s*\.\s*sql\s*\.\s*)?(?:Connection|Statement|PreparedStatement|CallableStatement|ResultSet)\s+(?P<name>\w+)\s*=\s*[\w.]+\s*\.\s*(?:getConnection|createStatement|prepareStatement|prepareCall|executeQuery)\s*\(")
                    .unwrap(),
                RESOURCE_RELEASED,
            )),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Method may fail to close database resource")
        .with_remediation("Open connections, statements and result sets in try-with-resources"),

        Rule::new(
            "MS_SHOULD_BE_FINAL",
            "should_be_final",
            "style",
            Severity::Info,
            Matcher::masked_unless(
                Regex::new(r"^\s*(?:public|protected)\s+static\s+[\w.]+(?:<[^;=]*>)?(?:\[\])*\s+(?P<at>\w+)\s*[=;]").unwrap(),
                Regex::new(r"\bfinal\b").unwrap(),
            ),
        )
        .with_message("Field isn't final but should be")
        .with_remediation("Declare the static field final"),

        Rule::new(
            "MS_MUTABLE_ARRAY",
            "mutable_array",
            "style",
            Severity::Info,
            Matcher::masked_unless(
                Regex::new(r"^\s*public\s+static\s+final\s+[\w.<>]+\s*(?:\[\s*\])+\s*(?P<at>\w+)\s*=").unwrap(),
                Regex::new(r"=\s*(?:\{\s*\}|new\s+[\w.]+\s*\[\s*0\s*\])").unwrap(),
            ),
        )
        .with_message("Field is a mutable array")
        .with_remediation("Expose an unmodifiable List or return copies"),

        Rule::new(
            "CNT_ROUGH_CONSTANT_VALUE",
            "rough_constant_value",
            "correctness",
            Severity::Info,
            Matcher::masked_unless(
                Regex::new(r"\b(?:3\.14\d*|2\.718\d*)[dDfF]?\b").unwrap(),
                Regex::new(r"3\.1415926535|2\.71828182845").unwrap(),
            ),
        )
        .with_message("Rough value of known constant found")
        .with_remediation("Use Math.PI or Math.E"),

        Rule::new(
            "VA_FORMAT_STRING_USES_NEWLINE",
            "format_string_newline",
            "style",
            Severity::Info,
            Matcher::code(
                Regex::new(r#"\b(?:printf|format|formatted)\s*\(\s*(?:[\w.]+\s*,\s*)?"(?:[^"\\]|\\.)*\\n"#).unwrap(),
            ),
        )
        .with_message("Format string should use %n rather than \\n")
        .with_remediation("Use %n for a platform line separator"),

        Rule::new(
            "WEAK_MESSAGE_DIGEST",
            "weak_message_digest",
            "crypto",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"\bMessageDigest\s*\.\s*getInstance\s*\(\s*"(?i:md2|md4|md5|sha|sha-?1)"|\bDigestUtils\s*\.\s*(?:md5|sha1?)(?:Hex)?\s*\("#)
                    .unwrap(),
            ),
        )
        .with_message("MD2, MD4, MD5 and SHA-1 are weak hash functions")
        .with_remediation("Use SHA-256 or stronger"),

        Rule::new(
            "CIPHER_INTEGRITY_ECB",
            "cipher_ecb_mode",
            "crypto",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"\bCipher\s*\.\s*getInstance\s*\(\s*"(?:[^"/]+/ECB/[^"]*|AES|DES[^"]*|RC[24][^"]*|Blowfish[^"]*)""#)
                    .unwrap(),
            ),
        )
        .with_message("Cipher uses ECB mode or a broken algorithm, which provides no integrity")
        .with_remediation("Use AES/GCM/NoPadding"),

        Rule::new(
            "COMMAND_INJECTION",
            "command_injection",
            "injection",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r#"\bRuntime\s*\.\s*getRuntime\s*\(\s*\)\s*\.\s*exec\s*\(\s*(?:[^")\s]|"[^"]*"\s*\+)|\bnew\s+ProcessBuilder\s*\([^;]*"\s*\+"#)
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Potential command injection")
        .with_remediation("Pass a fixed executable and validated arguments as an array"),

        Rule::new(
            "OBJECT_DESERIALIZATION",
            "object_deserialization",
            "deserialization",
            Severity::Warning,
            Matcher::masked(Regex::new(r"\bnew\s+(?:ObjectInputStream|XMLDecoder)\s*\(").unwrap()),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Object deserialization is used")
        .with_description("Deserializing untrusted data can instantiate arbitrary gadget classes")
        .with_remediation("Use a data-only format, or an ObjectInputFilter allow list"),
    ]
    .into_iter()
    .map(|rule| rule.with_languages(&[Language::Java]))
    .collect();
}
