//! 文本清洗
//!
//! 每一跳翻译的前后都会过一遍 [`normalize`]。后端对散文的处理远好于
//! 符号：零宽字符会被悄悄吞掉，emoji 会被整段丢弃，大小写也经常被
//! 打乱。这里把符号展开成文字、压平空白、再按句子规则重排大小写，
//! 让文本以后端最不容易弄坏的形态进出。
//!
//! 纯函数，无状态，永不失败，且对自身输出幂等。

use regex::{Captures, Regex};

/// 符号字符的展开方式
enum SymbolClass {
    /// 普通字符，原样保留
    Plain(char),
    /// 纯表现层字符（变体选择符、零宽连接符），整个剥除
    Strip,
    /// 展开为带空格包围的文字名称
    Name(String),
}

/// 清洗文本
///
/// 流水线：解码 HTML 实体 → 剥除零宽/变体选择符 → 符号展开为文字 →
/// 压平空白 → 重排大小写。各步细节见对应的私有函数。
pub fn normalize(text: &str) -> String {
    let text = decode_entities(text);
    let text = expand_symbols(&text);
    let text = collapse_whitespace(&text);
    capitalize(&text)
}

/// 解码后端会吐出的 HTML 实体
///
/// 只做一轮替换，不递归解码。命名实体只覆盖后端实际会产生的基础
/// 集合，数字引用（十进制与十六进制）全量支持。
fn decode_entities(text: &str) -> String {
    let re_decimal = Regex::new(r"&#(\d+);").unwrap();
    let re_hex = Regex::new(r"&#[xX]([0-9a-fA-F]+);").unwrap();

    let text = re_decimal.replace_all(text, |caps: &Captures| {
        match caps[1].parse::<u32>().ok().and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });
    let text = re_hex.replace_all(&text, |caps: &Captures| {
        match u32::from_str_radix(&caps[1], 16).ok().and_then(char::from_u32) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });

    // `&amp;` 必须最后替换，否则会把一轮解码变成两轮
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 把符号字符展开为文字
///
/// 展开后的名称两侧各留一个空格，后续的空白压平会清理多余空格。
/// 未收录的符号原样放行，后端对它们的容忍度尚可。
fn expand_symbols(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for ch in text.chars() {
        match classify_symbol(ch) {
            SymbolClass::Plain(c) => output.push(c),
            SymbolClass::Strip => {}
            SymbolClass::Name(name) => {
                output.push(' ');
                output.push_str(&name);
                output.push(' ');
            }
        }
    }
    output
}

fn classify_symbol(ch: char) -> SymbolClass {
    match ch {
        // 零宽连接符与变体选择符没有独立语义，直接剥除
        '\u{200d}' => SymbolClass::Strip,
        '\u{fe00}'..='\u{fe0f}' => SymbolClass::Strip,
        '\u{180b}'..='\u{180d}' => SymbolClass::Strip,
        // 区域指示符按字母计算名称
        '\u{1f1e6}'..='\u{1f1ff}' => {
            let letter = (b'A' + (ch as u32 - 0x1f1e6) as u8) as char;
            SymbolClass::Name(format!("REGIONAL INDICATOR SYMBOL LETTER {}", letter))
        }
        _ => match symbol_name(ch) {
            Some(name) => SymbolClass::Name(name.to_string()),
            None => SymbolClass::Plain(ch),
        },
    }
}

/// 符号到名称的固定表
///
/// 名称沿用 Unicode 字符名，并做了三处手工修饰：肤色修饰符换成更
/// 短的说法；`EMOJI COMPONENT X` 写成 `WITH X`；以 ` MARK` 或
/// ` SIGN` 结尾的名称去掉后缀，避免翻译后端把 "sign" 当实词翻译。
fn symbol_name(ch: char) -> Option<&'static str> {
    let name = match ch {
        // 肤色修饰符
        '\u{1f3fb}' => "WHITE SKINNED",
        '\u{1f3fc}' => "LIGHT BROWN SKINNED",
        '\u{1f3fd}' => "MODERATE BROWN SKINNED",
        '\u{1f3fe}' => "DARK BROWN SKINNED",
        '\u{1f3ff}' => "BLACK SKINNED",
        // emoji 组件
        '\u{1f9b0}' => "WITH RED HAIR",
        '\u{1f9b1}' => "WITH CURLY HAIR",
        '\u{1f9b2}' => "WITH BALD",
        '\u{1f9b3}' => "WITH WHITE HAIR",
        // 笑脸与手势
        '😀' => "GRINNING FACE",
        '😁' => "GRINNING FACE WITH SMILING EYES",
        '😂' => "FACE WITH TEARS OF JOY",
        '🤣' => "ROLLING ON THE FLOOR LAUGHING",
        '😃' => "SMILING FACE WITH OPEN MOUTH",
        '😄' => "SMILING FACE WITH OPEN MOUTH AND SMILING EYES",
        '😅' => "SMILING FACE WITH OPEN MOUTH AND COLD SWEAT",
        '😉' => "WINKING FACE",
        '😊' => "SMILING FACE WITH SMILING EYES",
        '😍' => "SMILING FACE WITH HEART-SHAPED EYES",
        '😘' => "FACE THROWING A KISS",
        '😎' => "SMILING FACE WITH SUNGLASSES",
        '😏' => "SMIRKING FACE",
        '😐' => "NEUTRAL FACE",
        '😒' => "UNAMUSED FACE",
        '😔' => "PENSIVE FACE",
        '😞' => "DISAPPOINTED FACE",
        '😢' => "CRYING FACE",
        '😭' => "LOUDLY CRYING FACE",
        '😡' => "POUTING FACE",
        '😱' => "FACE SCREAMING IN FEAR",
        '😴' => "SLEEPING FACE",
        '😇' => "SMILING FACE WITH HALO",
        '🤔' => "THINKING FACE",
        '🤡' => "CLOWN FACE",
        '🤮' => "FACE WITH OPEN MOUTH VOMITING",
        '🤯' => "SHOCKED FACE WITH EXPLODING HEAD",
        '🥺' => "FACE WITH PLEADING EYES",
        '🥰' => "SMILING FACE WITH SMILING EYES AND THREE HEARTS",
        '🤷' => "SHRUG",
        '🙏' => "PERSON WITH FOLDED HANDS",
        '🙌' => "PERSON RAISING BOTH HANDS IN CELEBRATION",
        '👍' => "THUMBS UP",
        '👎' => "THUMBS DOWN",
        '👌' => "OK HAND",
        '👏' => "CLAPPING HANDS",
        '👋' => "WAVING HAND",
        '👀' => "EYES",
        '💪' => "FLEXED BICEPS",
        '🖕' => "REVERSED HAND WITH MIDDLE FINGER EXTENDED",
        '✌' => "VICTORY HAND",
        // 杂项图形
        '❤' => "HEAVY BLACK HEART",
        '💔' => "BROKEN HEART",
        '💕' => "TWO HEARTS",
        '🔥' => "FIRE",
        '💯' => "HUNDRED POINTS SYMBOL",
        '🎉' => "PARTY POPPER",
        '✨' => "SPARKLES",
        '⭐' => "WHITE MEDIUM STAR",
        '🌟' => "GLOWING STAR",
        '☀' => "BLACK SUN WITH RAYS",
        '💀' => "SKULL",
        '☠' => "SKULL AND CROSSBONES",
        '👻' => "GHOST",
        '💩' => "PILE OF POO",
        '🐸' => "FROG FACE",
        '🍆' => "AUBERGINE",
        '🍑' => "PEACH",
        '🚀' => "ROCKET",
        '💦' => "SPLASHING SWEAT SYMBOL",
        '💨' => "DASH SYMBOL",
        '🗿' => "MOYAI",
        '❓' => "BLACK QUESTION MARK ORNAMENT",
        '❗' => "HEAVY EXCLAMATION MARK SYMBOL",
        // 以 MARK/SIGN 结尾的名称去掉后缀
        '♀' => "FEMALE",
        '♂' => "MALE",
        '™' => "TRADE MARK",
        '®' => "REGISTERED",
        '©' => "COPYRIGHT",
        _ => return None,
    };
    Some(name)
}

/// 压平空白
///
/// 每行去掉首尾空白、行内连续空格压成一个，整体再去首尾；最后把
/// 后端爱拆开的 "@ " 粘回 "@"。制表符保留，大小写重排要用它当
/// 句子边界。
fn collapse_whitespace(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let mut line = line.trim().to_string();
        while line.contains("  ") {
            line = line.replace("  ", " ");
        }
        lines.push(line);
    }
    lines.join("\n").trim().replace("@ ", "@")
}

/// 重排大小写
///
/// 全部转小写后，在字符串开头和 `. ? ! \t \n` 之后的第一个字母处
/// 强制大写。数字会消耗掉待用的大写标记，所以 "3.14" 这类数字串
/// 不会把后面的字母顶成大写。
fn capitalize(text: &str) -> String {
    let mut upper = true;
    let mut output = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphabetic() && upper {
            output.extend(ch.to_uppercase());
            upper = false;
        } else {
            output.push(ch);
        }
        if ch.is_numeric() && upper {
            upper = false;
        } else if matches!(ch, '\t' | '\n' | '.' | '?' | '!') {
            upper = true;
        }
    }
    output
}
