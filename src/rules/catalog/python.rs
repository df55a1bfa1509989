//! Python rules, identified by Bandit test ids
//!
//! Bandit severities map onto the three-level scale as HIGH to critical,
//! MEDIUM to warning and LOW to info. Hardcoded credentials are raised to
//! warning.

use lazy_static::lazy_static;
use regex::Regex;

use super::Rule;
use crate::rules::matchers::Matcher;
use crate::rules::results::{Confidence, Severity};
use crate::source::Language;

lazy_static! {
    /// Built-in Python rules
    pub static ref PYTHON_RULES: Vec<Rule> = vec![
        Rule::new(
            "B101",
            "assert_used",
            "correctness",
            Severity::Info,
            Matcher::masked(Regex::new(r"^\s*(?P<at>assert)\b").unwrap()),
        )
        .with_message("Use of assert detected")
        .with_description("assert statements are removed when compiling to optimised byte code, so checks relying on them silently disappear")
        .with_remediation("Raise an explicit exception instead of asserting"),

        Rule::new(
            "B102",
            "exec_used",
            "injection",
            Severity::Warning,
            Matcher::masked(Regex::new(r"(?:^|[^.\w])(?P<at>exec)\s*\(").unwrap()),
        )
        .with_message("Use of exec detected")
        .with_remediation("Avoid executing dynamically built code"),

        Rule::new(
            "B103",
            "set_bad_file_permissions",
            "filesystem",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\bos\s*\.\s*chmod\s*\([^,]+,\s*(?:0o?[0-7]*[2367]\b|[^)]*\bS_IW(?:OTH|GRP)\b)")
                    .unwrap(),
            ),
        )
        .with_message("chmod setting a permissive mask on file")
        .with_remediation("Grant the narrowest mode the file needs, e.g. 0o600"),

        Rule::new(
            "B104",
            "hardcoded_bind_all_interfaces",
            "transport",
            Severity::Warning,
            Matcher::code(Regex::new(r#"["']0\.0\.0\.0["']"#).unwrap()),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible binding to all interfaces")
        .with_remediation("Bind to a specific interface, or make the address configurable"),

        Rule::new(
            "B105",
            "hardcoded_password_string",
            "secrets",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"^\s*(?:[\w.]+\.)?(?P<at>(?i:\w*(?:password|passwd|pwd|secret|token|api_?key)\w*))\s*(?::\s*\w+\s*)?=\s*[rbuRBU]?["'][^"']+["']"#)
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible hardcoded password")
        .with_remediation("Load credentials from the environment or a secret store"),

        Rule::new(
            "B106",
            "hardcoded_password_funcarg",
            "secrets",
            Severity::Warning,
            Matcher::code_unless(
                Regex::new(r#"[(,]\s*(?P<at>(?i:\w*(?:password|passwd|pwd|secret|token)\w*))\s*=\s*[rbuRBU]?["'][^"']+["']"#)
                    .unwrap(),
                Regex::new(r"^\s*(?:async\s+)?def\b").unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible hardcoded password passed as keyword argument")
        .with_remediation("Pass credentials read from the environment or a secret store"),

        Rule::new(
            "B107",
            "hardcoded_password_default",
            "secrets",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"^\s*(?:async\s+)?def\s+\w+\s*\((?:.*?,)?\s*(?P<at>(?i:\w*(?:password|passwd|pwd|secret|token)\w*))\s*(?::\s*\w+\s*)?=\s*[rbuRBU]?["'][^"']+["']"#)
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible hardcoded password as argument default")
        .with_remediation("Default the parameter to None and require callers to supply it"),

        Rule::new(
            "B108",
            "hardcoded_tmp_directory",
            "filesystem",
            Severity::Warning,
            Matcher::code(Regex::new(r#"["']/(?:tmp|var/tmp|dev/shm)(?:/[^"']*)?["']"#).unwrap()),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Probable insecure usage of temp file/directory")
        .with_remediation("Use the tempfile module to create private temporary files"),

        Rule::new(
            "B110",
            "try_except_pass",
            "errors",
            Severity::Info,
            Matcher::Any(vec![
                Matcher::Sequence {
                    head: Regex::new(r"^\s*(?P<at>except)\b[^:]*:\s*$").unwrap(),
                    next: Regex::new(r"^\s*pass\s*$").unwrap(),
                },
                Matcher::masked(Regex::new(r"^\s*(?P<at>except)\b[^:]*:\s*pass\s*$").unwrap()),
            ]),
        )
        .with_message("Try, Except, Pass detected")
        .with_description("Silently swallowing exceptions hides failures")
        .with_remediation("Handle the exception, log it, or narrow the except clause"),

        Rule::new(
            "B112",
            "try_except_continue",
            "errors",
            Severity::Info,
            Matcher::Any(vec![
                Matcher::Sequence {
                    head: Regex::new(r"^\s*(?P<at>except)\b[^:]*:\s*$").unwrap(),
                    next: Regex::new(r"^\s*continue\s*$").unwrap(),
                },
                Matcher::masked(Regex::new(r"^\s*(?P<at>except)\b[^:]*:\s*continue\s*$").unwrap()),
            ]),
        )
        .with_message("Try, Except, Continue detected")
        .with_remediation("Log the failure before moving on to the next item"),

        Rule::new(
            "B113",
            "request_without_timeout",
            "transport",
            Severity::Warning,
            Matcher::masked_unless(
                Regex::new(r"\brequests\s*\.\s*(?:get|post|put|patch|delete|head|options|request)\s*\(").unwrap(),
                Regex::new(r"\btimeout\s*=").unwrap(),
            ),
        )
        .with_confidence(Confidence::Low)
        .with_message("Call to requests without timeout")
        .with_remediation("Pass an explicit timeout= to every request"),

        Rule::new(
            "B201",
            "flask_debug_true",
            "injection",
            Severity::Critical,
            Matcher::masked(Regex::new(r"\.\s*run\s*\(.*\bdebug\s*=\s*True\b").unwrap()),
        )
        .with_guard(Regex::new(r"(?m)^\s*(?:from\s+flask\b|import\s+flask\b)").unwrap())
        .with_confidence(Confidence::Medium)
        .with_message("A Flask app appears to be run with debug=True")
        .with_description("The Werkzeug debugger allows arbitrary code execution")
        .with_remediation("Never enable debug mode outside local development"),

        Rule::new(
            "B301",
            "pickle",
            "deserialization",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\b(?:c?[Pp]ickle|_pickle|dill|shelve|jsonpickle)\s*\.\s*(?:loads?|Unpickler|open|decode)\s*\(")
                    .unwrap(),
            ),
        )
        .with_message("Pickle and modules that wrap it can be unsafe when used to deserialize untrusted data")
        .with_remediation("Deserialize untrusted input with a data-only format such as JSON"),

        Rule::new(
            "B303",
            "md5",
            "crypto",
            Severity::Warning,
            Matcher::masked_unless(
                Regex::new(r"\bhashlib\s*\.\s*(?:md5|md4|md2|sha1)\s*\(|\b(?:MD2|MD4|MD5|SHA)\s*\.\s*new\s*\(|\bhashes\s*\.\s*(?:MD5|SHA1)\s*\(")
                    .unwrap(),
                Regex::new(r"\busedforsecurity\s*=\s*False\b").unwrap(),
            ),
        )
        .with_message("Use of insecure MD2, MD4, MD5, or SHA1 hash function")
        .with_remediation("Use SHA-256 or stronger, or pass usedforsecurity=False for non-security uses"),

        Rule::new(
            "B304",
            "ciphers",
            "crypto",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\b(?:ARC2|ARC4|Blowfish|DES|DES3|XOR)\s*\.\s*new\s*\(|\balgorithms\s*\.\s*(?:ARC4|Blowfish|IDEA|TripleDES|CAST5|SEED)\s*\(")
                    .unwrap(),
            ),
        )
        .with_message("Use of insecure cipher")
        .with_remediation("Use AES in an authenticated mode such as GCM"),

        Rule::new(
            "B305",
            "cipher_modes",
            "crypto",
            Severity::Warning,
            Matcher::masked(Regex::new(r"\bMODE_ECB\b|\bmodes\s*\.\s*ECB\s*\(").unwrap()),
        )
        .with_message("Use of insecure cipher mode ECB")
        .with_remediation("Use an authenticated mode such as GCM"),

        Rule::new(
            "B306",
            "mktemp_q",
            "filesystem",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\btempfile\s*\.\s*mktemp\s*\(|(?:^|[^.\w])(?P<at>mktemp)\s*\(").unwrap(),
            ),
        )
        .with_message("Use of insecure and deprecated function (mktemp)")
        .with_remediation("Use tempfile.mkstemp or NamedTemporaryFile"),

        Rule::new(
            "B307",
            "eval",
            "injection",
            Severity::Warning,
            Matcher::masked(Regex::new(r"(?:^|[^.\w])(?P<at>eval)\s*\(").unwrap()),
        )
        .with_message("Use of possibly insecure function - consider using safer ast.literal_eval")
        .with_remediation("Parse literals with ast.literal_eval instead of eval"),

        Rule::new(
            "B310",
            "urllib_urlopen",
            "transport",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\b(?:urllib\d?\s*\.\s*(?:request\s*\.\s*)?)?(?:urlopen|urlretrieve|URLopener|FancyURLopener)\s*\(")
                    .unwrap(),
            ),
        )
        .with_message("Audit url open for permitted schemes")
        .with_description("urlopen accepts file:// and custom schemes, which can read local files")
        .with_remediation("Validate the URL scheme before opening it"),

        Rule::new(
            "B311",
            "random",
            "crypto",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"\brandom\s*\.\s*(?:random|randint|randrange|choice|choices|uniform|triangular|shuffle|sample|getrandbits)\s*\(")
                    .unwrap(),
            ),
        )
        .with_message("Standard pseudo-random generators are not suitable for security/cryptographic purposes")
        .with_remediation("Use the secrets module for tokens and keys"),

        Rule::new(
            "B312",
            "telnetlib",
            "transport",
            Severity::Critical,
            Matcher::masked(Regex::new(r"\btelnetlib\s*\.\s*Telnet\s*\(").unwrap()),
        )
        .with_message("Telnet-related functions are being called; Telnet transmits data in cleartext")
        .with_remediation("Use SSH instead of Telnet"),

        Rule::new(
            "B314",
            "xml_bad_elementtree",
            "deserialization",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\b(?:xml\s*\.\s*etree\s*\.\s*c?ElementTree|c?ElementTree|ET|etree)\s*\.\s*(?:parse|fromstring|iterparse|XMLParser|XML)\s*\(")
                    .unwrap(),
            ),
        )
        .with_message("Using xml.etree to parse untrusted XML data is known to be vulnerable to XML attacks")
        .with_remediation("Parse untrusted XML with defusedxml"),

        Rule::new(
            "B321",
            "ftplib",
            "transport",
            Severity::Critical,
            Matcher::masked(Regex::new(r"\bftplib\s*\.\s*FTP\s*\(").unwrap()),
        )
        .with_message("FTP-related functions are being called; FTP transmits data in cleartext")
        .with_remediation("Use SFTP or FTPS"),

        Rule::new(
            "B323",
            "unverified_context",
            "transport",
            Severity::Warning,
            Matcher::masked(Regex::new(r"\bssl\s*\.\s*_create_unverified_context\s*\(").unwrap()),
        )
        .with_message("Creating an unverified SSL context disables certificate validation")
        .with_remediation("Use ssl.create_default_context()"),

        Rule::new(
            "B324",
            "hashlib_insecure_functions",
            "crypto",
            Severity::Critical,
            Matcher::code_unless(
                Regex::new(r#"\bhashlib\s*\.\s*new\s*\(\s*["'](?i:md2|md4|md5|sha1|sha-1)["']"#).unwrap(),
                Regex::new(r"\busedforsecurity\s*=\s*False\b").unwrap(),
            ),
        )
        .with_message("Use of weak hash algorithm in hashlib.new")
        .with_remediation("Request sha256 or stronger from hashlib.new"),

        Rule::new(
            "B501",
            "request_with_no_cert_validation",
            "transport",
            Severity::Critical,
            Matcher::masked(Regex::new(r"\bverify\s*=\s*False\b").unwrap()),
        )
        .with_message("Call with verify=False disabling SSL certificate checks")
        .with_remediation("Keep certificate verification on; point verify= at a CA bundle if needed"),

        Rule::new(
            "B506",
            "yaml_load",
            "deserialization",
            Severity::Warning,
            Matcher::masked_unless(
                Regex::new(r"\byaml\s*\.\s*load\s*\(").unwrap(),
                Regex::new(r"\bLoader\s*=\s*(?:yaml\s*\.\s*)?C?SafeLoader\b").unwrap(),
            ),
        )
        .with_message("Use of unsafe yaml load; allows instantiation of arbitrary objects")
        .with_remediation("Use yaml.safe_load()"),

        Rule::new(
            "B507",
            "ssh_no_host_key_verification",
            "transport",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\.\s*set_missing_host_key_policy\s*\(\s*(?:paramiko\s*\.\s*)?(?:AutoAddPolicy|WarningPolicy)\b")
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Paramiko call with policy set to automatically trust the unknown host key")
        .with_remediation("Use RejectPolicy and manage known_hosts explicitly"),

        Rule::new(
            "B601",
            "paramiko_calls",
            "injection",
            Severity::Warning,
            Matcher::masked(Regex::new(r"\.\s*exec_command\s*\(").unwrap()),
        )
        .with_guard(Regex::new(r"(?m)^\s*(?:import|from)\s+paramiko\b").unwrap())
        .with_confidence(Confidence::Medium)
        .with_message("Possible shell injection via Paramiko call, check inputs are properly sanitized")
        .with_remediation("Quote every interpolated argument with shlex.quote"),

        Rule::new(
            "B602",
            "subprocess_popen_with_shell_equals_true",
            "injection",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\bsubprocess\s*\.\s*(?:Popen|call|check_call|check_output|run)\s*\(.*\bshell\s*=\s*True\b")
                    .unwrap(),
            ),
        )
        .with_message("subprocess call with shell=True identified, security issue")
        .with_description("Building a shell command from untrusted input allows command injection")
        .with_remediation("Pass an argument list and leave shell=False"),

        Rule::new(
            "B603",
            "subprocess_without_shell_equals_true",
            "injection",
            Severity::Info,
            Matcher::masked_unless(
                Regex::new(r"\bsubprocess\s*\.\s*(?:Popen|call|check_call|check_output|run)\s*\(").unwrap(),
                Regex::new(r"\bshell\s*=\s*True\b").unwrap(),
            ),
        )
        .with_confidence(Confidence::Low)
        .with_message("subprocess call - check for execution of untrusted input")
        .with_remediation("Make sure the executable and its arguments are not attacker controlled"),

        Rule::new(
            "B604",
            "any_other_function_with_shell_equals_true",
            "injection",
            Severity::Warning,
            Matcher::masked_unless(
                Regex::new(r"\bshell\s*=\s*True\b").unwrap(),
                Regex::new(r"\bsubprocess\s*\.").unwrap(),
            ),
        )
        .with_confidence(Confidence::Low)
        .with_message("Function call with shell=True parameter identified, possible security issue")
        .with_remediation("Avoid running commands through a shell"),

        Rule::new(
            "B605",
            "start_process_with_a_shell",
            "injection",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\bos\s*\.\s*(?:system|popen[234]?)\s*\(|\bpopen2\s*\.\s*popen[234]?\s*\(|\bcommands\s*\.\s*(?:getoutput|getstatusoutput)\s*\(")
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Starting a process with a shell, possible injection detected")
        .with_remediation("Use subprocess with an argument list instead of a shell string"),

        Rule::new(
            "B607",
            "start_process_with_partial_path",
            "injection",
            Severity::Info,
            Matcher::code(
                Regex::new(r#"\b(?:subprocess\s*\.\s*(?:Popen|call|check_call|check_output|run)|os\s*\.\s*(?:system|popen[234]?|spawn\w*|exec\w*))\s*\(\s*\[?\s*[rbuRBU]?["'](?P<at>[^/\\."'\s][^"']*)["']"#)
                    .unwrap(),
            ),
        )
        .with_message("Starting a process with a partial executable path")
        .with_remediation("Use the absolute path of the executable"),

        Rule::new(
            "B608",
            "hardcoded_sql_expressions",
            "injection",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"(?i)(?:["']\s*(?:select\s.*\sfrom|insert\s+into|update\s.*\sset|delete\s+from)\b[^"']*["']\s*(?:\+|%|\.\s*format\s*\()|\bf["']\s*(?:select\s.*\sfrom|insert\s+into|update\s.*\sset|delete\s+from)\b[^"']*\{)"#)
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Low)
        .with_message("Possible SQL injection vector through string-based query construction")
        .with_remediation("Use parameterised queries"),

        Rule::new(
            "B609",
            "linux_commands_wildcard_injection",
            "injection",
            Severity::Critical,
            Matcher::code(
                Regex::new(r#"\b(?:subprocess\s*\.\s*\w+|os\s*\.\s*(?:system|popen[234]?))\s*\(\s*[rbuRBU]?["'][^"']*\b(?:tar|chown|chmod|rsync)\b[^"']*\*"#)
                    .unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Possible wildcard injection in call")
        .with_description("File names starting with '-' expand into options of tar, chown, chmod and rsync")
        .with_remediation("List files explicitly or prefix the wildcard with ./"),

        Rule::new(
            "B701",
            "jinja2_autoescape_false",
            "injection",
            Severity::Critical,
            Matcher::masked(Regex::new(r"\bEnvironment\s*\(.*\bautoescape\s*=\s*False\b").unwrap()),
        )
        .with_message("Using jinja2 templates with autoescape=False is dangerous and can lead to XSS")
        .with_remediation("Use autoescape=True or select_autoescape()"),

        Rule::new(
            "B702",
            "use_of_mako_templates",
            "injection",
            Severity::Warning,
            Matcher::masked(Regex::new(r"\bTemplate\s*\(").unwrap()),
        )
        .with_guard(Regex::new(r"(?m)^\s*(?:from\s+mako\b|import\s+mako\b)").unwrap())
        .with_message("Mako templates allow HTML/JS rendering by default and are inherently open to XSS attacks")
        .with_remediation("Escape every expression with the h filter, or use a template engine that autoescapes"),
    ]
    .into_iter()
    .map(|rule| rule.with_languages(&[Language::Python]))
    .collect();
}
