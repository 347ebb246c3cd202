//! Known-type registry and log format placeholders.
//!
//! A type is "known" when generated hook text can name it without extra
//! imports: C primitives plus the Foundation classes and protocols. Anything
//! else is opaque to us and is dropped by default when building a model.

use crate::types::TypeRef;
use std::collections::HashSet;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Built-in registry
// ---------------------------------------------------------------------------

const PRIMITIVE_TYPES: &[&str] =
    &["id", "void", "char", "int", "unsigned", "double", "float", "long", "bool", "BOOL"];

const FOUNDATION_TYPES: &[&str] = &[
    "NSObject",
    "NSAffineTransform", "NSAppleEventDescriptor", "NSAppleEventManager", "NSAppleScript",
    "NSArchiver", "NSArray", "NSAssertionHandler", "NSAttributedString", "NSAutoreleasePool",
    "NSBlockOperation", "NSBundle", "NSCache", "NSCachedURLResponse", "NSCalendar",
    "NSCharacterSet", "NSClassDescription", "NSCloneCommand", "NSCloseCommand", "NSCoder",
    "NSComparisonPredicate", "NSCompoundPredicate", "NSCondition", "NSConditionLock",
    "NSConnection", "NSCountCommand", "NSCountedSet", "NSCreateCommand", "NSData",
    "NSDataDetector", "NSDate", "NSDateComponents", "NSDateFormatter", "NSDecimalNumber",
    "NSDecimalNumberHandler", "NSDeleteCommand", "NSDictionary", "NSDirectoryEnumerator",
    "NSDistantObject", "NSDistantObjectRequest", "NSDistributedLock",
    "NSDistributedNotificationCenter", "NSEnumerator", "NSError", "NSException",
    "NSExistsCommand", "NSExpression", "NSFileCoordinator", "NSFileHandle", "NSFileManager",
    "NSFileVersion", "NSFileWrapper", "NSFormatter", "NSGarbageCollector", "NSGetCommand",
    "NSHashTable", "NSHost", "NSHTTPCookie", "NSHTTPCookieStorage", "NSHTTPURLResponse",
    "NSIndexPath", "NSIndexSet", "NSIndexSpecifier", "NSInputStream", "NSInvocation",
    "NSInvocationOperation", "NSKeyedArchiver", "NSKeyedUnarchiver", "NSLinguisticTagger",
    "NSLocale", "NSLock", "NSLogicalTest", "NSMachBootstrapServer", "NSMachPort", "NSMapTable",
    "NSMessagePort", "NSMessagePortNameServer", "NSMetadataItem", "NSMetadataQuery",
    "NSMetadataQueryAttributeValueTuple", "NSMetadataQueryResultGroup", "NSMethodSignature",
    "NSMiddleSpecifier", "NSMoveCommand", "NSMutableArray", "NSMutableAttributedString",
    "NSMutableCharacterSet", "NSMutableData", "NSMutableDictionary", "NSMutableIndexSet",
    "NSMutableOrderedSet", "NSMutableSet", "NSMutableString", "NSMutableURLRequest",
    "NSNameSpecifier", "NSNetService", "NSNetServiceBrowser", "NSNotification",
    "NSNotificationCenter", "NSNotificationQueue", "NSNull", "NSNumber", "NSNumberFormatter",
    "NSOperation", "NSOperationQueue", "NSOrderedSet", "NSOrthography", "NSOutputStream",
    "NSPipe", "NSPointerArray", "NSPointerFunctions", "NSPort", "NSPortCoder", "NSPortMessage",
    "NSPortNameServer", "NSPositionalSpecifier", "NSPredicate", "NSProcessInfo",
    "NSPropertyListSerialization", "NSPropertySpecifier", "NSProtocolChecker", "NSProxy",
    "NSQuitCommand", "NSRandomSpecifier", "NSRangeSpecifier", "NSRecursiveLock",
    "NSRegularExpression", "NSRelativeSpecifier", "NSRunLoop", "NSScanner",
    "NSScriptClassDescription", "NSScriptCoercionHandler", "NSScriptCommand",
    "NSScriptCommandDescription", "NSScriptExecutionContext", "NSScriptObjectSpecifier",
    "NSScriptSuiteRegistry", "NSScriptWhoseTest", "NSSet", "NSSetCommand", "NSSocketPort",
    "NSSocketPortNameServer", "NSSortDescriptor", "NSSpecifierTest", "NSSpellServer",
    "NSStream", "NSString", "NSTask", "NSTextCheckingResult", "NSThread", "NSTimer",
    "NSTimeZone", "NSUbiquitousKeyValueStore", "NSUnarchiver", "NSUndoManager",
    "NSUniqueIDSpecifier", "NSURL", "NSURLAuthenticationChallenge", "NSURLCache",
    "NSURLConnection", "NSURLCredential", "NSURLCredentialStorage", "NSURLDownload",
    "NSURLHandle", "NSURLProtectionSpace", "NSURLProtocol", "NSURLRequest", "NSURLResponse",
    "NSUserAppleScriptTask", "NSUserAutomatorTask", "NSUserDefaults", "NSUserNotification",
    "NSUserNotificationCenter", "NSUserScriptTask", "NSUserUnixTask", "NSUUID", "NSValue",
    "NSValueTransformer", "NSWhoseSpecifier", "NSXMLDocument", "NSXMLDTD", "NSXMLDTDNode",
    "NSXMLElement", "NSXMLNode", "NSXMLParser", "NSXPCConnection", "NSXPCInterface",
    "NSXPCListener", "NSXPCListenerEndpoint", "NSCoding", "NSComparisonMethods",
    "NSConnectionDelegate", "NSCopying", "NSDecimalNumberBehaviors",
    "NSErrorRecoveryAttempting", "NSFastEnumeration", "NSFileManagerDelegate",
    "NSFilePresenter", "NSKeyedArchiverDelegate", "NSKeyedUnarchiverDelegate",
    "NSKeyValueCoding", "NSKeyValueObserving", "NSLocking", "NSMachPortDelegate",
    "NSMetadataQueryDelegate", "NSMutableCopying", "NSNetServiceBrowserDelegate",
    "NSNetServiceDelegate", "NSPortDelegate", "NSScriptingComparisonMethods",
    "NSScriptKeyValueCoding", "NSScriptObjectSpecifiers", "NSSecureCoding",
    "NSSpellServerDelegate", "NSStreamDelegate", "NSURLAuthenticationChallengeSender",
    "NSURLConnectionDataDelegate", "NSURLConnectionDelegate", "NSURLHandleClient",
    "NSURLProtocolClient", "NSUserNotificationCenterDelegate", "NSXMLParserDelegate",
    "NSXPCListenerDelegate", "NSXPCProxyCreating",
];

fn builtin_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| PRIMITIVE_TYPES.iter().chain(FOUNDATION_TYPES).copied().collect())
}

/// Whether `name` is one of the compiled-in known types (exact, case-sensitive).
pub fn is_builtin_type(name: &str) -> bool {
    builtin_set().contains(name)
}

/// Classify against the built-in registry only.
pub fn is_known(ty: &TypeRef) -> bool {
    is_builtin_type(ty.base_name())
}

// ---------------------------------------------------------------------------
// Extended registry
// ---------------------------------------------------------------------------

/// Built-in registry plus names supplied by the caller (e.g. from `.hooker.toml`).
/// The built-in set itself is never modified.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    extra: HashSet<String>,
}

impl TypeRegistry {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_known(&self, ty: &TypeRef) -> bool {
        let base = ty.base_name();
        is_builtin_type(base) || self.extra.contains(base)
    }

    pub fn extra_count(&self) -> usize {
        self.extra.len()
    }
}

// ---------------------------------------------------------------------------
// NSLog format placeholders
// ---------------------------------------------------------------------------

/// Format specifier (without the `%`) for logging a value of `ty` with NSLog.
/// Anything not in the table is logged as an object.
pub fn format_specifier(ty: &TypeRef) -> &'static str {
    match ty.to_string().as_str() {
        "int" | "unsigned" | "BOOL" | "bool" | "short" => "d",
        "unsigned int" => "u",
        "long" => "ld",
        "unsigned long" => "lu",
        "long long" => "lld",
        "unsigned long long" => "llu",
        "float" | "double" => "g",
        "char" => "c",
        "char *" | "const char *" => "s",
        _ => "@",
    }
}
