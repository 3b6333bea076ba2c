use std::fmt;

macro_rules! define_tokens {
    (
        symbols { $($sym_name:ident => $sym_str:literal),* $(,)? }
        keywords { $($kw_name:ident => $kw_str:literal),* $(,)? }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenType {
            // Special
            Illegal,
            Eof,

            // Names & Literals
            Name,
            Number,
            String,
            MalformedNumber,
            UnterminatedString,
            UnterminatedLongString,
            UnterminatedComment,

            // Symbols (operators & delimiters)
            $($sym_name,)*

            // Keywords (auto-generated from macro)
            $($kw_name,)*
        }

        impl fmt::Display for TokenType {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    TokenType::Illegal => "illegal character",
                    TokenType::Eof => "end of file",
                    TokenType::Name => "name",
                    TokenType::Number => "number",
                    TokenType::String => "string",
                    TokenType::MalformedNumber => "malformed number",
                    TokenType::UnterminatedString => "unterminated string",
                    TokenType::UnterminatedLongString => "unterminated long string",
                    TokenType::UnterminatedComment => "unterminated comment",
                    $(TokenType::$sym_name => concat!("`", $sym_str, "`"),)*
                    $(TokenType::$kw_name => concat!("`", $kw_str, "`"),)*
                };
                write!(f, "{}", s)
            }
        }

        /// Called by the lexer to check if a name is a reserved word
        pub fn lookup_name(name: &str) -> TokenType {
            match name {
                $($kw_str => TokenType::$kw_name,)*
                _ => TokenType::Name,
            }
        }

        /// True for every reserved word of the language.
        pub fn is_keyword(name: &str) -> bool {
            !matches!(lookup_name(name), TokenType::Name)
        }
    };
}

// ════════════════════════════════════════════════════════════════════════════
//  TOKEN DEFINITIONS
// ════════════════════════════════════════════════════════════════════════════

define_tokens! {
    symbols {
        // Arithmetic
        Plus        => "+",
        Minus       => "-",
        Star        => "*",
        Slash       => "/",
        DoubleSlash => "//",
        Percent     => "%",
        Caret       => "^",
        Hash        => "#",

        // Bitwise
        Ampersand  => "&",
        Tilde      => "~",
        Bar        => "|",
        ShiftLeft  => "<<",
        ShiftRight => ">>",

        // Comparison
        Eq    => "==",
        NotEq => "~=",
        Lte   => "<=",
        Gte   => ">=",
        Lt    => "<",
        Gt    => ">",

        Assign => "=",

        // Delimiters
        LParen      => "(",
        RParen      => ")",
        LBrace      => "{",
        RBrace      => "}",
        LBracket    => "[",
        RBracket    => "]",
        DoubleColon => "::",
        Semicolon   => ";",
        Colon       => ":",
        Comma       => ",",
        Dot         => ".",
        Concat      => "..",
        Ellipsis    => "...",
    }

    keywords {
        And      => "and",
        Break    => "break",
        Do       => "do",
        Else     => "else",
        ElseIf   => "elseif",
        End      => "end",
        False    => "false",
        For      => "for",
        Function => "function",
        Goto     => "goto",
        If       => "if",
        In       => "in",
        Local    => "local",
        Nil      => "nil",
        Not      => "not",
        Or       => "or",
        Repeat   => "repeat",
        Return   => "return",
        Then     => "then",
        True     => "true",
        Until    => "until",
        While    => "while",
    }
}
