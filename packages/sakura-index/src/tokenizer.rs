use tantivy::tokenizer::{Token, TokenStream, Tokenizer};
use unicode_segmentation::{UnicodeSegmentation, UnicodeWordIndices};

/// Splits text on Unicode word boundaries.
///
/// Han ideographs have no word-joining rule, so Chinese text comes out one character per token
/// and multi-character keywords are matched as phrases.
#[derive(Clone, Debug, Default)]
pub struct WordTokenizer;
impl Tokenizer for WordTokenizer {
	type TokenStream<'a> = WordTokenStream<'a>;

	fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
		WordTokenStream { words: text.unicode_word_indices(), token: Token::default() }
	}
}

pub struct WordTokenStream<'a> {
	words: UnicodeWordIndices<'a>,
	token: Token,
}
impl TokenStream for WordTokenStream<'_> {
	fn advance(&mut self) -> bool {
		let Some((offset, word)) = self.words.next() else {
			return false;
		};

		self.token.text.clear();
		self.token.text.push_str(word);

		self.token.offset_from = offset;
		self.token.offset_to = offset + word.len();
		self.token.position = self.token.position.wrapping_add(1);

		true
	}

	fn token(&self) -> &Token {
		&self.token
	}

	fn token_mut(&mut self) -> &mut Token {
		&mut self.token
	}
}
