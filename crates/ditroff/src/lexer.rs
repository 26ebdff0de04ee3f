//! Tokenizer for ditroff text.
//!
//! Ditroff is line oriented, but commands are not: several commands may share a
//! line (`V720H72` or `wh24`) and each command letter decides how far its operand
//! runs. Some operands are numeric and end at the first non-digit, some run to the
//! next whitespace character and some run to the end of the line.
//!
//! The tokenizer is a table-driven finite state machine.
//! Each input character is first mapped to an equivalence [`Class`] by [`classify`].
//! The pair (current state, class) then indexes into a transition table whose
//! entries either move the machine to a new state or signal that the pending token
//! should be emitted.
//!
//! Tokenization never fails. Characters that cannot start a command are skipped,
//! and operands that are cut short are emitted as-is; it is up to the
//! interpreter to decide what to do with them.

/// Type of a ditroff command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TokenKind {
    /// `p<n>`: begin page _n_.
    BeginPage,
    /// `#<text>`: a comment running to the end of the line.
    Comment,
    /// `s<n>`: set the type size.
    SetSize,
    /// `f<n>`: select the font mounted at position _n_.
    SetFont,
    /// `c<char>`: print a single character.
    CharLiteral,
    /// `C<name>`: print the glyph with the given name.
    CharNamed,
    /// `N<n>`: print the glyph with index _n_ in the current font.
    CharIndexed,
    /// `H<n>`: move to absolute horizontal position _n_.
    MoveAbsH,
    /// `V<n>`: move to absolute vertical position _n_.
    MoveAbsV,
    /// `h<n>`: move right by _n_.
    MoveRelH,
    /// `v<n>`: move down by _n_.
    MoveRelV,
    /// `<n><char>`: move right by _n_ and print the character.
    ///
    /// The operand is always a run of digits followed by exactly one character.
    MovePrint,
    /// `n<b> <a>`: end of an output line, with the space before and after.
    InformEOL,
    /// `w`: an interword space. This command has no operand.
    WordSpace,
    /// `D<args>`: a drawing command.
    Drawing,
    /// `m<scheme> <values>`: set the stroke colour.
    SetColour,
    /// `t<text>`: print text, advancing after each character.
    TextNormal,
    /// `u<n> <text>`: print text with _n_ units of tracking between characters.
    TextTracked,
    /// `x <args>`: device control.
    DeviceControl,
}

/// Token in a ditroff file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    /// The trimmed text of the operand, exactly as it appears in the source.
    ///
    /// The command letter is not included.
    /// For [`TokenKind::MovePrint`] the operand is the digits and the character,
    /// e.g. `24a`.
    pub operand: String,
    /// Byte offset of the start of the command in the source.
    pub offset: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, operand: S, offset: usize) -> Token {
        Token {
            kind,
            operand: operand.into(),
            offset,
        }
    }

    /// Approximate span of the token in the source.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + 1 + self.operand.len()
    }
}

impl TokenKind {
    /// Returns the letter that introduces the command.
    ///
    /// [`TokenKind::MovePrint`] has no letter.
    pub fn letter(self) -> Option<char> {
        use TokenKind::*;
        Some(match self {
            BeginPage => 'p',
            Comment => '#',
            SetSize => 's',
            SetFont => 'f',
            CharLiteral => 'c',
            CharNamed => 'C',
            CharIndexed => 'N',
            MoveAbsH => 'H',
            MoveAbsV => 'V',
            MoveRelH => 'h',
            MoveRelV => 'v',
            MovePrint => return None,
            InformEOL => 'n',
            WordSpace => 'w',
            Drawing => 'D',
            SetColour => 'm',
            TextNormal => 't',
            TextTracked => 'u',
            DeviceControl => 'x',
        })
    }
}

/// Writes the token back out as ditroff.
///
/// Commands whose operand runs to the end of the line must be followed by a newline.
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::DeviceControl => write!(f, "x {}", self.operand),
            kind => match kind.letter() {
                Some(letter) => write!(f, "{}{}", letter, self.operand),
                None => write!(f, "{}", self.operand),
            },
        }
    }
}

/// Equivalence class of an input character.
///
/// Each command letter gets its own class.
/// All other characters are grouped by the role they play in operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    EndOfLine,
    Blank,
    Digit,
    Sign,
    Hash,
    UpperC,
    UpperD,
    UpperH,
    UpperN,
    UpperV,
    LowerC,
    LowerF,
    LowerH,
    LowerM,
    LowerN,
    LowerP,
    LowerS,
    LowerT,
    LowerU,
    LowerV,
    LowerW,
    LowerX,
    /// Any other ASCII letter.
    Letter,
    /// Everything else, including all non-ASCII characters.
    Other,
}

impl Class {
    pub const COUNT: usize = Class::Other as usize + 1;
}

const fn classify_ascii(c: u8) -> Class {
    use Class::*;
    match c {
        b'\n' => EndOfLine,
        b' ' | b'\t' | b'\r' | 0x0B | 0x0C => Blank,
        b'0'..=b'9' => Digit,
        b'-' | b'+' => Sign,
        b'#' => Hash,
        b'C' => UpperC,
        b'D' => UpperD,
        b'H' => UpperH,
        b'N' => UpperN,
        b'V' => UpperV,
        b'c' => LowerC,
        b'f' => LowerF,
        b'h' => LowerH,
        b'm' => LowerM,
        b'n' => LowerN,
        b'p' => LowerP,
        b's' => LowerS,
        b't' => LowerT,
        b'u' => LowerU,
        b'v' => LowerV,
        b'w' => LowerW,
        b'x' => LowerX,
        b'a'..=b'z' | b'A'..=b'Z' => Letter,
        _ => Other,
    }
}

const ASCII_CLASSES: [Class; 128] = {
    let mut t = [Class::Other; 128];
    let mut i = 0;
    while i < 128 {
        t[i] = classify_ascii(i as u8);
        i += 1;
    }
    t
};

/// Returns the equivalence class of a character.
pub fn classify(c: char) -> Class {
    if c.is_ascii() {
        ASCII_CLASSES[c as usize]
    } else {
        Class::Other
    }
}

/// Returns the command introduced by a command letter class.
fn command_kind(class: Class) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match class {
        Class::Hash => Comment,
        Class::UpperC => CharNamed,
        Class::UpperD => Drawing,
        Class::UpperH => MoveAbsH,
        Class::UpperN => CharIndexed,
        Class::UpperV => MoveAbsV,
        Class::LowerC => CharLiteral,
        Class::LowerF => SetFont,
        Class::LowerH => MoveRelH,
        Class::LowerM => SetColour,
        Class::LowerN => InformEOL,
        Class::LowerP => BeginPage,
        Class::LowerS => SetSize,
        Class::LowerT => TextNormal,
        Class::LowerU => TextTracked,
        Class::LowerV => MoveRelV,
        Class::LowerW => WordSpace,
        Class::LowerX => DeviceControl,
        _ => return None,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Between commands.
    Start,
    /// After a numeric command letter; leading blanks are skipped.
    NumberLead,
    Number,
    /// Inside the digits of a move-and-print command.
    MoveDigits,
    /// After `c`; the next character is the operand.
    Literal,
    /// After `C`; the operand runs to whitespace.
    Name,
    EolLead,
    EolFirst,
    EolGap,
    EolSecond,
    /// The operand runs to the end of the line.
    Line,
    /// Operand of a `t` command.
    Text,
}

impl State {
    const COUNT: usize = State::Text as usize + 1;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// Consume the character and remain in the start state.
    Skip,
    /// Consume a command letter and enter the state.
    Command(State),
    /// Start a move-and-print command at this digit.
    BeginMove,
    /// Consume the character and enter the state.
    Goto(State),
    /// Emit the pending token; the character is not consumed.
    Emit,
    /// Consume the character and emit the pending token including it.
    EmitWith,
    /// Consume a command letter that has no operand and emit it.
    EmitNiladic,
}

const TABLE: [[Action; Class::COUNT]; State::COUNT] = {
    use Action::*;
    let mut t = [[Emit; Class::COUNT]; State::COUNT];

    let mut start = [Skip; Class::COUNT];
    start[Class::Digit as usize] = BeginMove;
    start[Class::Hash as usize] = Command(State::Line);
    start[Class::UpperC as usize] = Command(State::Name);
    start[Class::UpperD as usize] = Command(State::Line);
    start[Class::UpperH as usize] = Command(State::NumberLead);
    start[Class::UpperN as usize] = Command(State::NumberLead);
    start[Class::UpperV as usize] = Command(State::NumberLead);
    start[Class::LowerC as usize] = Command(State::Literal);
    start[Class::LowerF as usize] = Command(State::NumberLead);
    start[Class::LowerH as usize] = Command(State::NumberLead);
    start[Class::LowerM as usize] = Command(State::Line);
    start[Class::LowerN as usize] = Command(State::EolLead);
    start[Class::LowerP as usize] = Command(State::NumberLead);
    start[Class::LowerS as usize] = Command(State::NumberLead);
    start[Class::LowerT as usize] = Command(State::Text);
    start[Class::LowerU as usize] = Command(State::Line);
    start[Class::LowerV as usize] = Command(State::NumberLead);
    start[Class::LowerW as usize] = EmitNiladic;
    start[Class::LowerX as usize] = Command(State::Line);
    t[State::Start as usize] = start;

    let mut number_lead = [Emit; Class::COUNT];
    number_lead[Class::Blank as usize] = Goto(State::NumberLead);
    number_lead[Class::Sign as usize] = Goto(State::Number);
    number_lead[Class::Digit as usize] = Goto(State::Number);
    t[State::NumberLead as usize] = number_lead;

    let mut number = [Emit; Class::COUNT];
    number[Class::Digit as usize] = Goto(State::Number);
    t[State::Number as usize] = number;

    let mut move_digits = [EmitWith; Class::COUNT];
    move_digits[Class::Digit as usize] = Goto(State::MoveDigits);
    move_digits[Class::EndOfLine as usize] = Emit;
    move_digits[Class::Blank as usize] = Emit;
    t[State::MoveDigits as usize] = move_digits;

    let mut literal = [EmitWith; Class::COUNT];
    literal[Class::EndOfLine as usize] = Emit;
    t[State::Literal as usize] = literal;

    let mut name = [Goto(State::Name); Class::COUNT];
    name[Class::EndOfLine as usize] = Emit;
    name[Class::Blank as usize] = Emit;
    t[State::Name as usize] = name;

    let mut eol_lead = [Emit; Class::COUNT];
    eol_lead[Class::Blank as usize] = Goto(State::EolLead);
    eol_lead[Class::Sign as usize] = Goto(State::EolFirst);
    eol_lead[Class::Digit as usize] = Goto(State::EolFirst);
    t[State::EolLead as usize] = eol_lead;

    let mut eol_first = [Emit; Class::COUNT];
    eol_first[Class::Digit as usize] = Goto(State::EolFirst);
    eol_first[Class::Blank as usize] = Goto(State::EolGap);
    t[State::EolFirst as usize] = eol_first;

    let mut eol_gap = [Emit; Class::COUNT];
    eol_gap[Class::Blank as usize] = Goto(State::EolGap);
    eol_gap[Class::Sign as usize] = Goto(State::EolSecond);
    eol_gap[Class::Digit as usize] = Goto(State::EolSecond);
    t[State::EolGap as usize] = eol_gap;

    let mut eol_second = [Emit; Class::COUNT];
    eol_second[Class::Digit as usize] = Goto(State::EolSecond);
    t[State::EolSecond as usize] = eol_second;

    let mut line = [Goto(State::Line); Class::COUNT];
    line[Class::EndOfLine as usize] = Emit;
    t[State::Line as usize] = line;

    let mut text = [Goto(State::Text); Class::COUNT];
    text[Class::EndOfLine as usize] = Emit;
    // Old troff variants end a word at a blank and follow it with a numeric
    // field on the same line. This is only recognized behind the feature flag.
    if cfg!(feature = "legacy-text") {
        text[Class::Blank as usize] = Emit;
    }
    t[State::Text as usize] = text;

    t
};

struct Pending {
    kind: TokenKind,
    offset: usize,
    operand_start: usize,
}

/// Iterator over the tokens in ditroff source text.
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    state: State,
    pending: Option<Pending>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            state: State::Start,
            pending: None,
        }
    }

    fn emit(&mut self, end: usize) -> Option<Token> {
        self.state = State::Start;
        let Pending {
            mut kind,
            offset,
            operand_start,
        } = self.pending.take()?;
        let operand = self.source[operand_start..end].trim();
        if kind == TokenKind::MovePrint && operand.ends_with(|c: char| c.is_ascii_digit()) {
            // The digits were not followed by a character to print.
            kind = TokenKind::MoveRelH;
        }
        Some(Token::new(kind, operand, offset))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(&(i, c)) = self.chars.peek() else {
                return self.emit(self.source.len());
            };
            let class = classify(c);
            match TABLE[self.state as usize][class as usize] {
                Action::Skip => {
                    self.chars.next();
                }
                Action::Command(state) => {
                    self.chars.next();
                    let Some(kind) = command_kind(class) else {
                        continue;
                    };
                    self.pending = Some(Pending {
                        kind,
                        offset: i,
                        operand_start: i + c.len_utf8(),
                    });
                    self.state = state;
                }
                Action::BeginMove => {
                    self.chars.next();
                    self.pending = Some(Pending {
                        kind: TokenKind::MovePrint,
                        offset: i,
                        operand_start: i,
                    });
                    self.state = State::MoveDigits;
                }
                Action::Goto(state) => {
                    self.chars.next();
                    self.state = state;
                }
                Action::Emit => {
                    if let Some(token) = self.emit(i) {
                        return Some(token);
                    }
                }
                Action::EmitWith => {
                    self.chars.next();
                    if let Some(token) = self.emit(i + c.len_utf8()) {
                        return Some(token);
                    }
                }
                Action::EmitNiladic => {
                    self.chars.next();
                    if let Some(kind) = command_kind(class) {
                        return Some(Token::new(kind, "", i));
                    }
                }
            }
        }
    }
}

/// Tokenizes ditroff source text.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::TokenKind::*;
    use super::*;

    macro_rules! tokenize_tests {
        ($( ($name: ident, $input: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let input = $input;
                    let want: Vec<Token> = $want;
                    let got = tokenize(input);
                    assert_eq!(got, want);
                }
            )+
        };
    }

    fn token(kind: TokenKind, operand: &str, offset: usize) -> Token {
        Token::new(kind, operand, offset)
    }

    tokenize_tests!(
        (
            numeric_commands,
            "p1\ns10\nf2\n",
            vec![
                token(BeginPage, "1", 0),
                token(SetSize, "10", 3),
                token(SetFont, "2", 7),
            ],
        ),
        (
            moves_on_one_line,
            "V720H72h-24v12",
            vec![
                token(MoveAbsV, "720", 0),
                token(MoveAbsH, "72", 4),
                token(MoveRelH, "-24", 7),
                token(MoveRelV, "12", 11),
            ],
        ),
        (
            move_print,
            "24a12b",
            vec![token(MovePrint, "24a", 0), token(MovePrint, "12b", 3)],
        ),
        (
            move_print_non_ascii,
            "24é",
            vec![token(MovePrint, "24é", 0)],
        ),
        (
            move_print_without_glyph,
            "24\n",
            vec![token(MoveRelH, "24", 0)],
        ),
        (
            char_literal,
            "cxcy",
            vec![token(CharLiteral, "x", 0), token(CharLiteral, "y", 2)],
        ),
        (
            char_named,
            "Chy Cem\n",
            vec![token(CharNamed, "hy", 0), token(CharNamed, "em", 4)],
        ),
        (
            char_indexed,
            "N65\n",
            vec![token(CharIndexed, "65", 0)],
        ),
        (
            inform_eol,
            "n40 0\n",
            vec![token(InformEOL, "40 0", 0)],
        ),
        (
            word_space,
            "wh24",
            vec![token(WordSpace, "", 0), token(MoveRelH, "24", 1)],
        ),
        (
            text_to_end_of_line,
            "tHello\nH0",
            vec![token(TextNormal, "Hello", 0), token(MoveAbsH, "0", 7)],
        ),
        (
            tracked_text,
            "u12 Hello\n",
            vec![token(TextTracked, "12 Hello", 0)],
        ),
        (
            drawing,
            "Dl 100 0\n",
            vec![token(Drawing, "l 100 0", 0)],
        ),
        (
            colour,
            "mr 65535 0 0\nmd\n",
            vec![
                token(SetColour, "r 65535 0 0", 0),
                token(SetColour, "d", 13),
            ],
        ),
        (
            device_control,
            "x res 240 24 40\n",
            vec![token(DeviceControl, "res 240 24 40", 0)],
        ),
        (
            comment,
            "# a comment\np1",
            vec![token(Comment, "a comment", 0), token(BeginPage, "1", 12)],
        ),
        (
            blank_lines_and_junk,
            "\n\n  ;\np1",
            vec![token(BeginPage, "1", 6)],
        ),
        (
            number_cut_short_at_end_of_input,
            "p",
            vec![token(BeginPage, "", 0)],
        ),
        (
            numeric_operand_with_leading_blank,
            "s 10\n",
            vec![token(SetSize, "10", 0)],
        ),
    );

    #[cfg(not(feature = "legacy-text"))]
    #[test]
    fn text_keeps_blanks() {
        assert_eq!(
            tokenize("tHello world 24a\n"),
            vec![token(TextNormal, "Hello world 24a", 0)]
        );
    }

    #[cfg(feature = "legacy-text")]
    #[test]
    fn legacy_text_ends_at_blank() {
        assert_eq!(
            tokenize("tHello 24a\n"),
            vec![token(TextNormal, "Hello", 0), token(MovePrint, "24a", 7)]
        );
    }

    #[test]
    fn sample_document() {
        let input = "x T ascii\nx res 240 24 40\np1\nV40\nH0\ntHello\nn40 0\n";
        let got: Vec<TokenKind> = tokenize(input).into_iter().map(|t| t.kind).collect();
        assert_eq!(
            got,
            vec![
                DeviceControl,
                DeviceControl,
                BeginPage,
                MoveAbsV,
                MoveAbsH,
                TextNormal,
                InformEOL
            ]
        );
    }

    #[test]
    fn operands_are_the_trimmed_source_text() {
        let input = "x T ps\nx font 1 TR\np1\ns10000\nf1\nV12000\nH72000\nmd\nDFd\ntHello\nwh2500\nu-10 world\n36x\nCem\nN65\nn12000 0\n# done\n";
        for token in tokenize(input) {
            let rest = &input[token.offset..];
            let rest = match token.kind {
                MovePrint => rest,
                _ => &rest[1..],
            };
            assert!(
                rest.trim_start().starts_with(&token.operand),
                "operand {:?} is not at offset {} of the source",
                token.operand,
                token.offset
            );
            assert_eq!(token.operand.trim(), token.operand);
        }
    }

    #[test]
    fn display_round_trip() {
        let input = "x T ps\np1\ns10\nf1\nV12000\nH72000\nmd\nDFd\ntHello\nw\nh2500\nu-10 world\n36x\nCem\nca\nN65\nn12000 0\n#done\n";
        let tokens = tokenize(input);
        let output: String = tokens.iter().map(|t| format!["{t}\n"]).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn classify_command_letters() {
        assert_eq!(classify('p'), Class::LowerP);
        assert_eq!(classify('C'), Class::UpperC);
        assert_eq!(classify('q'), Class::Letter);
        assert_eq!(classify('7'), Class::Digit);
        assert_eq!(classify('\t'), Class::Blank);
        assert_eq!(classify('\n'), Class::EndOfLine);
        assert_eq!(classify('é'), Class::Other);
    }
}
